#![allow(clippy::unwrap_used)]
// Integration tests for the Config-audit, IPAM and webhook clients using wiremock.

use futures_util::{TryStreamExt, pin_mut};
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vpcaudit_api::{AccessKey, ConfigAuditClient, Error, IpamClient, RpcClient, WebhookClient};

// ── Helpers ─────────────────────────────────────────────────────────

fn credentials() -> AccessKey {
    AccessKey::new("test-key-id", SecretString::from("test-secret".to_owned()))
}

fn rpc(server: &MockServer, version: &'static str) -> RpcClient {
    RpcClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        version,
        credentials(),
    )
}

async fn config_setup() -> (MockServer, ConfigAuditClient) {
    let server = MockServer::start().await;
    let client = ConfigAuditClient::from_rpc(
        rpc(&server, "2020-09-07"),
        "ap-southeast-1",
        "ca-test-aggregator",
    )
    .with_page_size(2);
    (server, client)
}

async fn ipam_setup() -> (MockServer, IpamClient) {
    let server = MockServer::start().await;
    let client = IpamClient::from_rpc(rpc(&server, "2023-02-28"), "ap-southeast-1");
    (server, client)
}

fn vpc(account: i64, id: &str) -> serde_json::Value {
    json!({
        "AccountId": account,
        "ResourceId": id,
        "ResourceName": format!("{id}-name"),
        "Region": "ap-southeast-1",
        "ResourceStatus": "Available",
        "ResourceType": "ACS::VPC::VPC"
    })
}

fn inventory_page(records: &[serde_json::Value], next: Option<&str>) -> serde_json::Value {
    json!({
        "RequestId": "req-inventory",
        "DiscoveredResourceProfiles": {
            "DiscoveredResourceProfileList": records,
            "NextToken": next,
            "MaxResults": 2
        }
    })
}

// ── Config-audit inventory ──────────────────────────────────────────

#[tokio::test]
async fn test_list_vpcs_follows_next_token() {
    let (server, client) = config_setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("Action", "ListAggregateDiscoveredResources"))
        .and(query_param_is_missing("NextToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inventory_page(
            &[vpc(1, "vpc-a"), vpc(1, "vpc-b")],
            Some("t1"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("NextToken", "t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(inventory_page(&[vpc(2, "vpc-c")], Some("t2"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("NextToken", "t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inventory_page(&[], Some(""))))
        .expect(1)
        .mount(&server)
        .await;

    let vpcs = client.list_vpcs().await.unwrap();

    let ids: Vec<_> = vpcs.iter().map(|v| v.resource_id.as_str()).collect();
    assert_eq!(ids, vec!["vpc-a", "vpc-b", "vpc-c"]);
    assert_eq!(vpcs[2].account_id, 2);
    assert_eq!(vpcs[0].resource_name, "vpc-a-name");
}

#[tokio::test]
async fn test_list_vpcs_sends_signed_fixed_parameters() {
    let (server, client) = config_setup().await;

    Mock::given(method("GET"))
        .and(query_param("Version", "2020-09-07"))
        .and(query_param("Format", "JSON"))
        .and(query_param("SignatureMethod", "HMAC-SHA1"))
        .and(query_param("SignatureVersion", "1.0"))
        .and(query_param("AccessKeyId", "test-key-id"))
        .and(query_param("RegionId", "ap-southeast-1"))
        .and(query_param("AggregatorId", "ca-test-aggregator"))
        .and(query_param("ResourceType", "ACS::VPC::VPC"))
        .and(query_param("MaxResults", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inventory_page(&[], None)))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.list_vpcs().await.unwrap().is_empty());

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default().to_owned();
    assert!(query.contains("&Signature="), "unsigned request: {query}");
    assert!(query.contains("ResourceType=ACS%3A%3AVPC%3A%3AVPC"));
    assert!(query.contains("SignatureNonce="));
}

#[tokio::test]
async fn test_failed_second_page_returns_error_not_partial() {
    let (server, client) = config_setup().await;

    Mock::given(method("GET"))
        .and(query_param_is_missing("NextToken"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(inventory_page(&[vpc(1, "vpc-a")], Some("t1"))),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("NextToken", "t1"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "RequestId": "req-503",
            "Code": "ServiceUnavailable",
            "Message": "The request has failed due to a temporary failure of the server."
        })))
        .mount(&server)
        .await;

    let result = client.list_vpcs().await;

    match result {
        Err(err @ Error::Api { status: 503, .. }) => {
            assert!(err.is_transient());
            assert_eq!(err.request_id(), Some("req-503"));
        }
        other => panic!("expected 503 API error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_signature_rejection_is_auth_error() {
    let (server, client) = config_setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "RequestId": "req-sig",
            "HostId": "config.ap-southeast-1.aliyuncs.com",
            "Code": "SignatureDoesNotMatch",
            "Message": "Specified signature is not matched with our calculation."
        })))
        .mount(&server)
        .await;

    let err = client.list_vpcs().await.unwrap_err();

    assert!(err.is_auth_rejected(), "expected auth rejection, got: {err:?}");
    assert_eq!(err.api_error_code(), Some("SignatureDoesNotMatch"));
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = config_setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Unexpected": true })))
        .mount(&server)
        .await;

    let result = client.list_vpcs().await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_endless_tokens_hit_page_ceiling() {
    let server = MockServer::start().await;
    let client = ConfigAuditClient::from_rpc(
        rpc(&server, "2020-09-07").with_max_pages(3),
        "ap-southeast-1",
        "ca-test-aggregator",
    );

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(inventory_page(&[vpc(1, "vpc-a")], Some("again"))),
        )
        .expect(3)
        .mount(&server)
        .await;

    let result = client.list_vpcs().await;

    assert!(
        matches!(
            result,
            Err(Error::PaginationExhausted { max_pages: 3, .. })
        ),
        "expected PaginationExhausted, got: {result:?}"
    );
}

// ── IPAM ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_pool_pages_follow_cursor() {
    let (server, client) = ipam_setup().await;

    Mock::given(method("GET"))
        .and(query_param("Action", "ListIpamPools"))
        .and(query_param("Version", "2023-02-28"))
        .and(query_param_is_missing("NextToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "RequestId": "req-pools-1",
            "IpamPools": [{ "IpamPoolId": "ipam-pool-1", "IpamPoolName": "prod" }],
            "NextToken": "p2",
            "TotalCount": 2
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("Action", "ListIpamPools"))
        .and(query_param("NextToken", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "IpamPools": [{ "IpamPoolId": "ipam-pool-2" }],
            "TotalCount": 2
        })))
        .mount(&server)
        .await;

    let pages = client.pool_pages();
    pin_mut!(pages);
    let mut pools = Vec::new();
    while let Some(page) = pages.try_next().await.unwrap() {
        pools.extend(page.ipam_pools);
    }

    assert_eq!(pools.len(), 2);
    assert_eq!(pools[0].ipam_pool_name.as_deref(), Some("prod"));
    assert_eq!(pools[1].ipam_pool_id, "ipam-pool-2");
    assert_eq!(pools[1].ipam_pool_name, None);
}

#[tokio::test]
async fn test_allocation_pages_carry_pool_id() {
    let (server, client) = ipam_setup().await;

    Mock::given(method("GET"))
        .and(query_param("Action", "ListIpamPoolAllocations"))
        .and(query_param("IpamPoolId", "ipam-pool-1"))
        .and(query_param("RegionId", "ap-southeast-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "IpamPoolAllocations": [
                { "ResourceId": "vpc-a", "ResourceType": "VPC", "Cidr": "10.0.0.0/16" },
                { "ResourceId": "custom-1", "ResourceType": "Custom", "Cidr": "10.1.0.0/16" }
            ],
            "NextToken": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pages = client.allocation_pages("ipam-pool-1");
    pin_mut!(pages);
    let page = pages.try_next().await.unwrap().unwrap();
    assert!(pages.try_next().await.unwrap().is_none());

    assert_eq!(page.ipam_pool_allocations.len(), 2);
    assert_eq!(page.ipam_pool_allocations[0].resource_type, "VPC");
    assert_eq!(page.ipam_pool_allocations[1].cidr.as_deref(), Some("10.1.0.0/16"));
}

// ── Webhook ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_webhook_posts_text_message() {
    let server = MockServer::start().await;
    let url = Url::parse(&format!("{}/open-apis/bot/v2/hook/abc", server.uri())).unwrap();
    let client = WebhookClient::with_client(reqwest::Client::new(), url);

    Mock::given(method("POST"))
        .and(path("/open-apis/bot/v2/hook/abc"))
        .and(body_json(json!({
            "msg_type": "text",
            "content": { "text": "Found 3 VPC resources" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    client.send_text("Found 3 VPC resources").await.unwrap();
}

#[tokio::test]
async fn test_webhook_non_success_status_is_error() {
    let server = MockServer::start().await;
    let client =
        WebhookClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad hook"))
        .mount(&server)
        .await;

    let result = client.send_text("hi").await;

    match result {
        Err(Error::Webhook { status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body, "bad hook");
        }
        other => panic!("expected Webhook error, got: {other:?}"),
    }
}
