//! Configuration for the vpcaudit CLI.
//!
//! TOML file + environment loading, access-key secret resolution
//! (env + keyring + plaintext), and translation to
//! `vpcaudit_core::AuditConfig`. The CLI layers flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use vpcaudit_core::{
    AccessKey, AuditConfig, IpamSettings, ReportFilter, ServiceCredentials, TlsVerification,
};

/// Keyring service name for stored secrets.
pub const KEYRING_SERVICE: &str = "vpcaudit";

/// Environment prefix; nested keys split on `__`.
pub const ENV_PREFIX: &str = "VPCAUDIT_";

const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting '{field}'")]
    Missing { field: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no access key secret configured for [{section}]")]
    NoCredentials { section: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    /// Region of the Config aggregator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Config aggregator id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregator_id: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Whole-run deadline in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<u64>,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Accounts counted but never reported.
    #[serde(default)]
    pub exclude_accounts: Vec<i64>,

    #[serde(default)]
    pub unmanaged_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    /// Extra CA certificate (PEM) for private endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Config-audit credentials (required).
    #[serde(default)]
    pub config_audit: ServiceSection,

    /// IPAM credentials (optional; without them the IPAM walk is skipped).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipam: Option<ServiceSection>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: None,
            aggregator_id: None,
            timeout: default_timeout(),
            deadline: None,
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            exclude_accounts: Vec::new(),
            unmanaged_only: false,
            webhook_url: None,
            ca_cert: None,
            config_audit: ServiceSection::default(),
            ipam: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    100
}
fn default_max_pages() -> u32 {
    10_000
}

/// Access key and endpoint settings for one service.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServiceSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    /// Plaintext secret (prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_secret: Option<String>,

    /// Environment variable holding the secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_secret_env: Option<String>,

    /// Endpoint override URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Service region override (IPAM only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Config {
    /// Copy with plaintext secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        cfg.config_audit.redact();
        if let Some(ipam) = cfg.ipam.as_mut() {
            ipam.redact();
        }
        cfg
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parsed webhook URL, if one is configured.
    pub fn webhook_url(&self) -> Result<Option<Url>, ConfigError> {
        self.webhook_url
            .as_deref()
            .map(|raw| parse_url("webhook_url", raw))
            .transpose()
    }
}

impl ServiceSection {
    fn redact(&mut self) {
        if self.access_key_secret.is_some() {
            self.access_key_secret = Some(REDACTED.into());
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "vpcaudit", "vpcaudit").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("vpcaudit");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// The layered provider: defaults, then the TOML file, then `VPCAUDIT_*`.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load from `path` (or the platform default) plus the environment.
/// A missing file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    debug!(path = %path.display(), "loading config");
    Ok(figment(&path).extract()?)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the access key secret for `[section_name]`.
///
/// Order: the named env var, the system keyring
/// (`vpcaudit` / `{section}/access-key-secret`), then plaintext.
pub fn resolve_secret(
    section: &ServiceSection,
    section_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Section's access_key_secret_env → env var lookup
    if let Some(ref env_name) = section.access_key_secret_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) =
        keyring::Entry::new(KEYRING_SERVICE, &format!("{section_name}/access-key-secret"))
    {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref secret) = section.access_key_secret {
        return Ok(SecretString::from(secret.clone()));
    }

    Err(ConfigError::NoCredentials {
        section: section_name.into(),
    })
}

fn resolve_access_key(
    section: &ServiceSection,
    section_name: &str,
) -> Result<AccessKey, ConfigError> {
    let id = section
        .access_key_id
        .clone()
        .ok_or_else(|| ConfigError::Missing {
            field: format!("{section_name}.access_key_id"),
        })?;
    Ok(AccessKey::new(id, resolve_secret(section, section_name)?))
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })
}

fn parse_endpoint(section: &ServiceSection, section_name: &str) -> Result<Option<Url>, ConfigError> {
    section
        .endpoint
        .as_deref()
        .map(|raw| parse_url(&format!("{section_name}.endpoint"), raw))
        .transpose()
}

fn required(value: Option<&String>, field: &str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| ConfigError::Missing {
            field: field.into(),
        })
}

// ── Translation ─────────────────────────────────────────────────────

/// Build the runtime `AuditConfig`.
///
/// Region, aggregator and Config-audit credentials are required. An
/// `[ipam]` section without `access_key_id` counts as absent.
pub fn to_audit_config(cfg: &Config) -> Result<AuditConfig, ConfigError> {
    let region = required(cfg.region.as_ref(), "region")?;
    let aggregator_id = required(cfg.aggregator_id.as_ref(), "aggregator_id")?;

    let config_audit = ServiceCredentials {
        access_key: resolve_access_key(&cfg.config_audit, "config_audit")?,
        endpoint: parse_endpoint(&cfg.config_audit, "config_audit")?,
    };

    let ipam = match &cfg.ipam {
        Some(section) if section.access_key_id.is_some() => Some(IpamSettings {
            access_key: resolve_access_key(section, "ipam")?,
            region: section.region.clone(),
            endpoint: parse_endpoint(section, "ipam")?,
        }),
        _ => None,
    };

    if cfg.page_size == 0 {
        return Err(ConfigError::Validation {
            field: "page_size".into(),
            reason: "must be at least 1".into(),
        });
    }
    if cfg.max_pages == 0 {
        return Err(ConfigError::Validation {
            field: "max_pages".into(),
            reason: "must be at least 1".into(),
        });
    }

    let tls = cfg
        .ca_cert
        .clone()
        .map_or(TlsVerification::SystemDefaults, TlsVerification::CustomCa);

    Ok(AuditConfig {
        region,
        aggregator_id,
        config_audit,
        ipam,
        page_size: cfg.page_size,
        max_pages: cfg.max_pages,
        timeout: Duration::from_secs(cfg.timeout),
        deadline: cfg.deadline.map(Duration::from_secs),
        tls,
        filter: ReportFilter {
            excluded_accounts: cfg.exclude_accounts.iter().copied().collect(),
            unmanaged_only: cfg.unmanaged_only,
        },
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Write;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    fn minimal() -> Config {
        Config {
            region: Some("ap-southeast-1".into()),
            aggregator_id: Some("ca-123".into()),
            config_audit: ServiceSection {
                access_key_id: Some("LTAI-config".into()),
                access_key_secret: Some("plain-secret".into()),
                ..ServiceSection::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn loads_file_over_defaults() {
        let file = write_config(
            r#"
region = "cn-shanghai"
aggregator_id = "ca-abc"
page_size = 50
exclude_accounts = [5130150745510468, 5020439416629852]

[config_audit]
access_key_id = "LTAI-x"
access_key_secret = "s3cret"

[ipam]
access_key_id = "LTAI-y"
access_key_secret_env = "IPAM_SECRET"
region = "cn-hangzhou"
"#,
        );

        let cfg = figment(file.path()).extract::<Config>().unwrap();

        assert_eq!(cfg.region.as_deref(), Some("cn-shanghai"));
        assert_eq!(cfg.page_size, 50);
        assert_eq!(cfg.max_pages, 10_000);
        assert_eq!(cfg.timeout, 30);
        assert_eq!(cfg.exclude_accounts, vec![5_130_150_745_510_468, 5_020_439_416_629_852]);
        let ipam = cfg.ipam.unwrap();
        assert_eq!(ipam.access_key_secret_env.as_deref(), Some("IPAM_SECRET"));
        assert_eq!(ipam.region.as_deref(), Some("cn-hangzhou"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = figment(&dir.path().join("absent.toml"))
            .extract::<Config>()
            .unwrap();
        assert_eq!(cfg.page_size, 100);
        assert!(cfg.ipam.is_none());
    }

    #[test]
    fn plaintext_secret_is_last_resort() {
        let section = ServiceSection {
            access_key_secret: Some("plain".into()),
            access_key_secret_env: Some("VPCAUDIT_TEST_SURELY_UNSET_VARIABLE".into()),
            ..ServiceSection::default()
        };
        let secret = resolve_secret(&section, "vpcaudit-test-no-such-section").unwrap();
        assert_eq!(secret.expose_secret(), "plain");
    }

    #[test]
    fn env_secret_wins_over_plaintext() {
        let (name, value) = std::env::vars()
            .find(|(_, v)| !v.is_empty())
            .expect("test environment has at least one variable");
        let section = ServiceSection {
            access_key_secret: Some("plain".into()),
            access_key_secret_env: Some(name),
            ..ServiceSection::default()
        };
        let secret = resolve_secret(&section, "vpcaudit-test-no-such-section").unwrap();
        assert_eq!(secret.expose_secret(), value);
    }

    #[test]
    fn no_secret_anywhere_is_an_error() {
        let result = resolve_secret(&ServiceSection::default(), "vpcaudit-test-no-such-section");
        assert!(matches!(result, Err(ConfigError::NoCredentials { .. })));
    }

    #[test]
    fn translates_to_audit_config() {
        let mut cfg = minimal();
        cfg.exclude_accounts = vec![7, 7, 9];
        cfg.deadline = Some(120);
        cfg.config_audit.endpoint = Some("http://127.0.0.1:9000/".into());

        let audit = to_audit_config(&cfg).unwrap();

        assert_eq!(audit.region, "ap-southeast-1");
        assert_eq!(audit.aggregator_id, "ca-123");
        assert_eq!(audit.config_audit.access_key.id, "LTAI-config");
        assert_eq!(
            audit.config_audit.endpoint.unwrap().as_str(),
            "http://127.0.0.1:9000/"
        );
        assert!(audit.ipam.is_none());
        assert_eq!(audit.filter.excluded_accounts.len(), 2);
        assert_eq!(audit.deadline, Some(Duration::from_secs(120)));
        assert_eq!(audit.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn ipam_region_defaults_to_audit_region() {
        let mut cfg = minimal();
        cfg.ipam = Some(ServiceSection {
            access_key_id: Some("LTAI-ipam".into()),
            access_key_secret: Some("ipam-secret".into()),
            ..ServiceSection::default()
        });

        let audit = to_audit_config(&cfg).unwrap();

        assert_eq!(audit.ipam_region(), "ap-southeast-1");
        assert_eq!(audit.ipam.unwrap().access_key.id, "LTAI-ipam");
    }

    #[test]
    fn missing_region_is_reported_by_name() {
        let mut cfg = minimal();
        cfg.region = None;
        match to_audit_config(&cfg) {
            Err(ConfigError::Missing { field }) => assert_eq!(field, "region"),
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn bad_endpoint_is_a_validation_error() {
        let mut cfg = minimal();
        cfg.config_audit.endpoint = Some("not a url".into());
        assert!(matches!(
            to_audit_config(&cfg),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn zero_page_limits_are_rejected() {
        let mut cfg = minimal();
        cfg.max_pages = 0;
        match to_audit_config(&cfg) {
            Err(ConfigError::Validation { field, .. }) => assert_eq!(field, "max_pages"),
            other => panic!("expected Validation, got {other:?}"),
        }

        let mut cfg = minimal();
        cfg.page_size = 0;
        match to_audit_config(&cfg) {
            Err(ConfigError::Validation { field, .. }) => assert_eq!(field, "page_size"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn redaction_masks_plaintext_secrets() {
        let shown = minimal().redacted().to_toml().unwrap();
        assert!(!shown.contains("plain-secret"));
        assert!(shown.contains(REDACTED));
        assert!(shown.contains("LTAI-config"));
    }
}
