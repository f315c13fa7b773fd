// RPC request signing (signature version 1.0, HMAC-SHA1).
//
// The gateway re-derives the signature from the query it receives, so the
// canonical form produced here must match its decoding byte for byte:
// keys sorted byte-wise, RFC 3986 unreserved characters left alone,
// everything else percent-encoded (space is `%20`, never `+`).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha1::Sha1;

/// Name of the query parameter carrying the signature.
pub const SIGNATURE_KEY: &str = "Signature";

/// HTTP method token baked into the string-to-sign.
const HTTP_METHOD: &str = "GET";

type HmacSha1 = Hmac<Sha1>;

// ── Credentials ──────────────────────────────────────────────────────

/// An access key pair for one cloud service.
#[derive(Debug, Clone)]
pub struct AccessKey {
    pub id: String,
    pub secret: SecretString,
}

impl AccessKey {
    pub fn new(id: impl Into<String>, secret: SecretString) -> Self {
        Self {
            id: id.into(),
            secret,
        }
    }
}

// ── Request parameters ───────────────────────────────────────────────

/// Query parameters of one RPC request, kept in byte-wise key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams(BTreeMap<String, String>);

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ── Signing ──────────────────────────────────────────────────────────

/// Output of [`sign`]: the signature and the canonical query it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedQuery {
    pub signature: String,
    pub canonical_query: String,
}

impl SignedQuery {
    /// The final request query: canonical query plus the encoded signature.
    pub fn to_query_string(&self) -> String {
        format!(
            "{}&{SIGNATURE_KEY}={}",
            self.canonical_query,
            percent_encode(&self.signature)
        )
    }
}

/// Percent-encode everything outside `A-Z a-z 0-9 - _ . ~`.
pub fn percent_encode(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Sorted, encoded `key=value` pairs joined by `&`, excluding the signature.
pub fn canonicalize(params: &RequestParams) -> String {
    params
        .pairs()
        .filter(|(key, _)| *key != SIGNATURE_KEY)
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// `GET&%2F&<encoded canonical query>`.
pub fn string_to_sign(canonical_query: &str) -> String {
    format!(
        "{HTTP_METHOD}&{}&{}",
        percent_encode("/"),
        percent_encode(canonical_query)
    )
}

/// Sign `params` with `secret`.
///
/// Pure: identical inputs always yield identical output. Freshness comes
/// from the caller-stamped `Timestamp` and `SignatureNonce` parameters.
pub fn sign(secret: &SecretString, params: &RequestParams) -> SignedQuery {
    let canonical_query = canonicalize(params);
    let to_sign = string_to_sign(&canonical_query);

    let key = format!("{}&", secret.expose_secret());
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(to_sign.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    SignedQuery {
        signature,
        canonical_query,
    }
}

// ── Nonces ───────────────────────────────────────────────────────────

/// Strictly increasing nanosecond-based `SignatureNonce` source.
///
/// Two requests stamped within the same clock tick still get distinct
/// nonces; the gateway rejects a reused nonce.
#[derive(Debug, Default)]
pub struct NonceSource {
    last: AtomicU64,
}

impl NonceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        let now = chrono::Utc::now()
            .timestamp_nanos_opt()
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or_default();
        let prev = self
            .last
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |prev| {
                Some(now.max(prev.saturating_add(1)))
            })
            .unwrap_or_else(|prev| prev);
        now.max(prev.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    fn describe_regions() -> RequestParams {
        RequestParams::new()
            .with("AccessKeyId", "testid")
            .with("Action", "DescribeRegions")
            .with("Format", "XML")
            .with("SignatureMethod", "HMAC-SHA1")
            .with("SignatureNonce", "3ee8c1b8-83d3-44af-a94f-4e0ad82fd6cf")
            .with("SignatureVersion", "1.0")
            .with("Timestamp", "2016-02-23T12:46:24Z")
            .with("Version", "2014-05-26")
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    #[test]
    fn published_describe_regions_vector() {
        let signed = sign(&secret("testsecret"), &describe_regions());

        assert_eq!(
            string_to_sign(&signed.canonical_query),
            "GET&%2F&AccessKeyId%3Dtestid%26Action%3DDescribeRegions%26Format%3DXML\
             %26SignatureMethod%3DHMAC-SHA1%26SignatureNonce%3D3ee8c1b8-83d3-44af-a94f-4e0ad82fd6cf\
             %26SignatureVersion%3D1.0%26Timestamp%3D2016-02-23T12%253A46%253A24Z\
             %26Version%3D2014-05-26"
        );
        assert_eq!(signed.signature, "OLeaidS1JvxuMvnyHOwuJ+uX5qY=");
    }

    #[test]
    fn signing_is_deterministic() {
        let params = describe_regions();
        let a = sign(&secret("k"), &params);
        let b = sign(&secret("k"), &params);
        assert_eq!(a, b);
    }

    #[test]
    fn canonical_query_ignores_insertion_order() {
        let forward = describe_regions();
        let mut pairs: Vec<(String, String)> = forward
            .pairs()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        pairs.reverse();
        let reversed: RequestParams = pairs.into_iter().collect();

        assert_eq!(canonicalize(&forward), canonicalize(&reversed));
        assert!(canonicalize(&forward).starts_with("AccessKeyId=testid&Action="));
    }

    #[test]
    fn signature_field_is_excluded() {
        let plain = describe_regions();
        let with_sig = describe_regions().with(SIGNATURE_KEY, "stale");

        assert_eq!(canonicalize(&plain), canonicalize(&with_sig));
        assert_eq!(sign(&secret("k"), &plain), sign(&secret("k"), &with_sig));
    }

    #[test]
    fn keys_sort_bytewise() {
        let params = RequestParams::new()
            .with("b", "1")
            .with("B", "2")
            .with("a", "3");
        assert_eq!(canonicalize(&params), "B=2&a=3&b=1");
    }

    #[test]
    fn strict_percent_encoding() {
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("a*b"), "a%2Ab");
        assert_eq!(percent_encode("a+b"), "a%2Bb");
        assert_eq!(percent_encode("~-_."), "~-_.");
        assert_eq!(percent_encode("ACS::VPC::VPC"), "ACS%3A%3AVPC%3A%3AVPC");
        assert_eq!(percent_encode("é"), "%C3%A9");
    }

    #[test]
    fn final_query_appends_encoded_signature() {
        let signed = sign(&secret("testsecret"), &describe_regions());
        let query = signed.to_query_string();

        assert!(query.starts_with(&signed.canonical_query));
        assert!(query.ends_with("&Signature=OLeaidS1JvxuMvnyHOwuJ%2BuX5qY%3D"));
    }

    #[test]
    fn nonces_strictly_increase() {
        let source = NonceSource::new();
        let mut prev = source.next();
        for _ in 0..1000 {
            let next = source.next();
            assert!(next > prev);
            prev = next;
        }
    }
}
