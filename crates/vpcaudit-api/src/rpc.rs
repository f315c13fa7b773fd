// Signed RPC transport shared by the Config-audit and IPAM clients.
//
// Every call is a GET against the service endpoint root with all
// parameters in the query string. Common protocol parameters are stamped
// fresh per request, then the whole set is signed once.

use futures_util::Stream;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::pagination::{self, CursorPage, DEFAULT_MAX_PAGES, NEXT_TOKEN};
use crate::signer::{self, AccessKey, NonceSource, RequestParams};
use crate::transport::TransportConfig;

/// `Timestamp` format: ISO-8601 UTC, second precision.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// ── Error response shape from the RPC gateway ────────────────────────

#[derive(serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorResponse {
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for one RPC-style service endpoint and API version.
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: Url,
    version: &'static str,
    credentials: AccessKey,
    nonces: NonceSource,
    max_pages: u32,
}

impl RpcClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an endpoint, API version, credentials and transport config.
    pub fn new(
        endpoint: Url,
        version: &'static str,
        credentials: AccessKey,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, endpoint, version, credentials))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        endpoint: Url,
        version: &'static str,
        credentials: AccessKey,
    ) -> Self {
        Self {
            http,
            endpoint,
            version,
            credentials,
            nonces: NonceSource::new(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Override the page-count ceiling applied to every paginated fetch.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    // ── Request construction ─────────────────────────────────────────

    /// Stamp the protocol-mandated parameters onto `params`.
    fn stamp(&self, action: &str, mut params: RequestParams) -> RequestParams {
        params
            .insert("Action", action)
            .insert("Version", self.version)
            .insert("Format", "JSON")
            .insert("SignatureMethod", "HMAC-SHA1")
            .insert("SignatureVersion", "1.0")
            .insert("AccessKeyId", self.credentials.id.as_str())
            .insert(
                "Timestamp",
                chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            )
            .insert("SignatureNonce", self.nonces.next().to_string());
        params
    }

    /// The fully signed request URL for `action`.
    pub fn signed_url(&self, action: &str, params: RequestParams) -> Url {
        let params = self.stamp(action, params);
        let signed = signer::sign(&self.credentials.secret, &params);

        let mut url = self.endpoint.clone();
        url.set_query(Some(&signed.to_query_string()));
        url
    }

    // ── Calls ────────────────────────────────────────────────────────

    /// Issue one signed call and decode the JSON body.
    pub async fn call<T: DeserializeOwned>(
        &self,
        action: &str,
        params: RequestParams,
    ) -> Result<T, Error> {
        debug!(
            action,
            endpoint = %self.endpoint,
            next_token = ?params.get(NEXT_TOKEN),
            "RPC call"
        );

        let url = self.signed_url(action, params);
        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    /// Stream every page of `action`, following `NextToken` until exhausted.
    ///
    /// `fixed` is sent on every request; the cursor is added only when the
    /// previous page returned a non-empty token.
    pub fn pages<P>(
        &self,
        action: &'static str,
        fixed: RequestParams,
    ) -> impl Stream<Item = Result<P, Error>>
    where
        P: CursorPage + DeserializeOwned,
    {
        pagination::cursor_pages(action, self.max_pages, move |cursor| {
            let mut params = fixed.clone();
            if let Some(token) = cursor {
                params.insert(NEXT_TOKEN, token);
            }
            self.call::<P>(action, params)
        })
    }

    /// Collect every record of `action` into one `Vec`, or fail as a whole.
    pub async fn fetch_all<P>(
        &self,
        action: &'static str,
        fixed: RequestParams,
    ) -> Result<Vec<P::Item>, Error>
    where
        P: CursorPage + DeserializeOwned,
    {
        pagination::collect_all(action, self.pages::<P>(action, fixed)).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            trace!(body_len = body.len(), "RPC response");
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Api {
                status: status.as_u16(),
                code: err.code.unwrap_or_else(|| status.as_str().to_owned()),
                message: err.message.unwrap_or_else(|| status.to_string()),
                request_id: err.request_id,
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                code: status.as_str().to_owned(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                request_id: None,
            }
        }
    }
}
