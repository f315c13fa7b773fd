use thiserror::Error;

/// Error codes the RPC gateway returns when it rejects the request signature
/// or the access key itself.
const AUTH_REJECTION_CODES: &[&str] = &[
    "SignatureDoesNotMatch",
    "IncompleteSignature",
    "InvalidAccessKeyId.NotFound",
    "InvalidAccessKeyId.Inactive",
    "Forbidden.AccessKeyDisabled",
    "InvalidTimeStamp.Expired",
    "SignatureNonceUsed",
];

/// Top-level error type for the `vpcaudit-api` crate.
///
/// Every failure is fatal to the fetch that raised it; nothing here is
/// retried. `vpcaudit-core` maps these into user-facing categories.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// Non-success HTTP status, parsed from the `{RequestId, Code, Message}`
    /// error envelope when the body has one.
    #[error("API error (HTTP {status}) {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Pagination ──────────────────────────────────────────────────
    /// The server kept returning continuation tokens past the page ceiling.
    #[error("Pagination of {operation} did not terminate after {max_pages} pages")]
    PaginationExhausted {
        operation: &'static str,
        max_pages: u32,
    },

    /// Listing the allocations of one IPAM pool failed.
    #[error("Failed to list allocations for IPAM pool {pool_id}: {source}")]
    PoolAllocations {
        pool_id: String,
        #[source]
        source: Box<Error>,
    },

    // ── Webhook ─────────────────────────────────────────────────────
    /// The notification webhook answered with a non-success status.
    #[error("Webhook delivery failed (HTTP {status})")]
    Webhook { status: u16, body: String },
}

impl Error {
    /// Returns `true` if the gateway rejected the signature or access key.
    pub fn is_auth_rejected(&self) -> bool {
        match self {
            Self::Api { status, code, .. } => {
                *status == 401 || *status == 403 || AUTH_REJECTION_CODES.contains(&code.as_str())
            }
            Self::PoolAllocations { source, .. } => source.is_auth_rejected(),
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error a caller could retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, code, .. } => {
                *status == 429 || *status >= 500 || code == "Throttling"
            }
            Self::PoolAllocations { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// Returns `true` if the request timed out in transit.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::PoolAllocations { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// The gateway request id, if the error envelope carried one.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Api { request_id, .. } => request_id.as_deref(),
            Self::PoolAllocations { source, .. } => source.request_id(),
            _ => None,
        }
    }

    /// Extract the API error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            Self::PoolAllocations { source, .. } => source.api_error_code(),
            _ => None,
        }
    }
}
