//! CLI-specific config helpers.
//!
//! Loading and credential resolution live in `vpcaudit-config`; this module
//! layers command-line overrides on top and builds the runtime config.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use vpcaudit_config::{Config, ConfigError};
use vpcaudit_core::AuditConfig;

use crate::cli::{CheckArgs, GlobalOpts};
use crate::error::CliError;

/// The config file in effect: `--config` or the platform default.
pub fn effective_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(vpcaudit_config::config_path)
}

/// Load the config file + environment for this invocation.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(vpcaudit_config::load_config(global.config.as_deref())?)
}

/// Apply global and `check` flag overrides onto the loaded config.
pub fn apply_overrides(cfg: &mut Config, global: &GlobalOpts, args: &CheckArgs) {
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if let Some(ref region) = args.region {
        cfg.region = Some(region.clone());
    }
    if let Some(ref aggregator) = args.aggregator {
        cfg.aggregator_id = Some(aggregator.clone());
    }
    if !args.exclude.is_empty() {
        cfg.exclude_accounts.clone_from(&args.exclude);
    }
    if args.unmanaged {
        cfg.unmanaged_only = true;
    }
    if let Some(ref webhook) = args.webhook {
        cfg.webhook_url = Some(webhook.clone());
    }
}

/// Everything `check` needs: the audit config plus where to send the report.
pub struct CheckPlan {
    pub audit: AuditConfig,
    pub webhook: Option<Url>,
}

/// Load, override, and translate for `check`.
pub fn check_plan(global: &GlobalOpts, args: &CheckArgs) -> Result<CheckPlan, CliError> {
    let mut cfg = load(global)?;
    apply_overrides(&mut cfg, global, args);

    let mut audit = vpcaudit_config::to_audit_config(&cfg).map_err(|e| match e {
        ConfigError::Missing { field } => CliError::MissingSetting {
            field,
            path: effective_path(global).display().to_string(),
        },
        other => other.into(),
    })?;
    if let Some(deadline) = args.deadline {
        audit.deadline = Some(deadline);
    }

    let webhook = match (&args.webhook, cfg.webhook_url()) {
        (Some(raw), Err(e)) => {
            return Err(CliError::Validation {
                field: "--webhook".into(),
                reason: format!("{raw}: {e}"),
            });
        }
        (None, result) => result?,
        (Some(_), Ok(url)) => url,
    };

    Ok(CheckPlan { audit, webhook })
}

/// Webhook delivery reuses the per-request timeout.
pub fn webhook_timeout(plan: &CheckPlan) -> Duration {
    plan.audit.timeout
}
