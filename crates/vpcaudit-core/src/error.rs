// ── Core error types ──
//
// User-facing errors from vpcaudit-core. Consumers see categories
// (authentication, connection, timeout, ...) rather than HTTP details.
// The `From<vpcaudit_api::Error>` impl does the translation.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Audit timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Request to {url} timed out")]
    RequestTimeout { url: String },

    // ── Remote errors ────────────────────────────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The gateway error code (e.g. `Throttling.User`).
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
        request_id: Option<String>,
    },

    #[error("Pagination did not terminate: {message}")]
    Pagination { message: String },

    #[error("Unexpected response: {message}")]
    Decode { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vpcaudit_api::Error> for CoreError {
    fn from(err: vpcaudit_api::Error) -> Self {
        if err.is_auth_rejected() {
            return CoreError::AuthenticationFailed {
                message: err.to_string(),
            };
        }

        match err {
            vpcaudit_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::RequestTimeout {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                    }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                        request_id: None,
                    }
                }
            }
            vpcaudit_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            vpcaudit_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            vpcaudit_api::Error::Api {
                status,
                code,
                message,
                request_id,
            } => CoreError::Api {
                message,
                code: Some(code),
                status: Some(status),
                request_id,
            },
            vpcaudit_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
            e @ vpcaudit_api::Error::PaginationExhausted { .. } => CoreError::Pagination {
                message: e.to_string(),
            },
            vpcaudit_api::Error::PoolAllocations { pool_id, source } => {
                match CoreError::from(*source) {
                    CoreError::Api {
                        message,
                        code,
                        status,
                        request_id,
                    } => CoreError::Api {
                        message: format!("IPAM pool {pool_id}: {message}"),
                        code,
                        status,
                        request_id,
                    },
                    CoreError::Decode { message } => CoreError::Decode {
                        message: format!("IPAM pool {pool_id}: {message}"),
                    },
                    CoreError::Pagination { message } => CoreError::Pagination {
                        message: format!("IPAM pool {pool_id}: {message}"),
                    },
                    other => other,
                }
            }
            vpcaudit_api::Error::Webhook { status, body } => CoreError::Api {
                message: format!("webhook rejected the message: {body}"),
                code: None,
                status: Some(status),
                request_id: None,
            },
        }
    }
}
