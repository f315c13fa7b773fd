// ── Runtime audit configuration ──
//
// These types describe *what* to audit and *how* to reach the services.
// They carry credential data and connection tuning, but never touch disk.
// The CLI constructs an `AuditConfig` and hands it to the `Auditor`.

use std::collections::HashSet;
use std::time::Duration;

use url::Url;
use vpcaudit_api::AccessKey;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Additional CA certificate file (private endpoints, TLS proxies).
    CustomCa(std::path::PathBuf),
}

/// Credentials and optional endpoint override for the Config-audit service.
#[derive(Debug, Clone)]
pub struct ServiceCredentials {
    pub access_key: AccessKey,
    /// Replaces `https://config.{region}.aliyuncs.com/` when set.
    pub endpoint: Option<Url>,
}

/// IPAM access. Absent means the IPAM walk is skipped.
#[derive(Debug, Clone)]
pub struct IpamSettings {
    pub access_key: AccessKey,
    /// IPAM region; falls back to the audit region.
    pub region: Option<String>,
    /// Replaces `https://vpcipam.{region}.aliyuncs.com/` when set.
    pub endpoint: Option<Url>,
}

/// Row filters applied by the reconciler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Accounts whose VPCs are counted but never reported.
    pub excluded_accounts: HashSet<i64>,
    /// Report only VPCs with no IPAM allocation.
    pub unmanaged_only: bool,
}

impl ReportFilter {
    pub fn is_excluded(&self, account_id: i64) -> bool {
        self.excluded_accounts.contains(&account_id)
    }
}

/// Everything one audit run needs. Immutable once built.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Region of the Config aggregator.
    pub region: String,
    /// Config aggregator id (`ca-…`).
    pub aggregator_id: String,
    pub config_audit: ServiceCredentials,
    pub ipam: Option<IpamSettings>,
    /// `MaxResults` per list call.
    pub page_size: u32,
    /// Page ceiling per paginated fetch.
    pub max_pages: u32,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Whole-run deadline covering both fetches.
    pub deadline: Option<Duration>,
    pub tls: TlsVerification,
    pub filter: ReportFilter,
}

impl AuditConfig {
    /// Region the IPAM walk runs against.
    pub fn ipam_region(&self) -> &str {
        self.ipam
            .as_ref()
            .and_then(|ipam| ipam.region.as_deref())
            .unwrap_or(&self.region)
    }
}
