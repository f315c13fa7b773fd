//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use vpcaudit_config::ConfigError;
use vpcaudit_core::CoreError;

/// Process exit codes (0 on success).
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONFIG: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(vpcaudit::connection_failed),
        help(
            "Check network access to the service endpoint.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("The service rejected the request credentials")]
    #[diagnostic(
        code(vpcaudit::auth_failed),
        help(
            "Verify the access key id and secret for the failing service.\n\
             {message}"
        )
    )]
    AuthFailed { message: String },

    #[error("No access key secret configured for [{section}]")]
    #[diagnostic(
        code(vpcaudit::no_credentials),
        help(
            "Set access_key_secret_env in the [{section}] section, store the secret in the\n\
             system keyring under service 'vpcaudit', user '{section}/access-key-secret',\n\
             or set access_key_secret in the config file."
        )
    )]
    NoCredentials { section: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(vpcaudit::api_error), help("Request id: {request_id}"))]
    ApiError {
        code: String,
        message: String,
        request_id: String,
    },

    #[error("{message}")]
    #[diagnostic(
        code(vpcaudit::pagination),
        help("Raise max_pages in the config file if the inventory is genuinely this large.")
    )]
    Pagination { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vpcaudit::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Missing required setting '{field}'")]
    #[diagnostic(
        code(vpcaudit::missing_setting),
        help(
            "Set it in the config file ({path}),\n\
             via a VPCAUDIT_ environment variable, or with the matching flag."
        )
    )]
    MissingSetting { field: String, path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(vpcaudit::config))]
    Config { message: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Audit timed out after {seconds}s")]
    #[diagnostic(
        code(vpcaudit::timeout),
        help("Increase --timeout / --deadline or check service responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(vpcaudit::request_timeout),
        help("Increase --timeout or check service responsiveness.")
    )]
    RequestTimeout { url: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Timeout { .. } | Self::RequestTimeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            Self::MissingSetting { .. } | Self::Config { .. } => exit_code::CONFIG,
            Self::ApiError { .. } | Self::Pagination { .. } => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::RequestTimeout { url } => CliError::RequestTimeout { url },
            CoreError::Api {
                message,
                code,
                status,
                request_id,
            } => CliError::ApiError {
                code: code
                    .or_else(|| status.map(|s| s.to_string()))
                    .unwrap_or_else(|| "unknown".into()),
                message,
                request_id: request_id.unwrap_or_else(|| "(none)".into()),
            },
            CoreError::Pagination { message } => CliError::Pagination { message },
            CoreError::Decode { message } => CliError::ApiError {
                code: "decode".into(),
                message,
                request_id: "(none)".into(),
            },
            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Missing { field } => CliError::MissingSetting {
                field,
                path: vpcaudit_config::config_path().display().to_string(),
            },
            ConfigError::Validation { field, reason } => CliError::Config {
                message: format!("invalid {field}: {reason}"),
            },
            ConfigError::NoCredentials { section } => CliError::NoCredentials { section },
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
