// ── Account alias cache ──
//
// Display names for member accounts, computed at most once per account.
// One lock spans check-then-insert so concurrent lookups of the same
// account never resolve twice.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::Mutex;

/// Get-or-compute cache of account display names.
#[derive(Debug, Default)]
pub struct AliasCache {
    aliases: Mutex<HashMap<i64, String>>,
}

impl AliasCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias for `account_id` using the built-in resolver.
    pub async fn alias(&self, account_id: i64) -> String {
        self.get_or_resolve(account_id, |id| async move { default_alias(id) })
            .await
    }

    /// Return the cached alias, or run `resolve` under the lock and cache it.
    pub async fn get_or_resolve<F, Fut>(&self, account_id: i64, resolve: F) -> String
    where
        F: FnOnce(i64) -> Fut,
        Fut: Future<Output = String>,
    {
        let mut aliases = self.aliases.lock().await;
        if let Some(alias) = aliases.get(&account_id) {
            return alias.clone();
        }
        let alias = resolve(account_id).await;
        aliases.insert(account_id, alias.clone());
        alias
    }

    pub async fn len(&self) -> usize {
        self.aliases.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.aliases.lock().await.is_empty()
    }
}

/// Accounts have no directory lookup; the alias is the formatted id.
fn default_alias(account_id: i64) -> String {
    format!("account-{account_id}")
}
