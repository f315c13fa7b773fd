use tracing::info;
use url::Url;

use super::types::{DiscoveredResource, ListDiscoveredResourcesResponse};
use crate::error::Error;
use crate::rpc::RpcClient;
use crate::signer::{AccessKey, RequestParams};
use crate::transport::TransportConfig;

/// API version of the Config service.
pub const API_VERSION: &str = "2020-09-07";

/// Resource-type discriminator for VPCs.
pub const VPC_RESOURCE_TYPE: &str = "ACS::VPC::VPC";

const LIST_RESOURCES: &str = "ListAggregateDiscoveredResources";

/// Default `MaxResults` per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Async client for the Config-audit aggregator inventory.
pub struct ConfigAuditClient {
    rpc: RpcClient,
    region: String,
    aggregator_id: String,
    page_size: u32,
}

impl ConfigAuditClient {
    /// Build a client against the regional public endpoint, or `endpoint`
    /// when given.
    pub fn new(
        credentials: AccessKey,
        region: impl Into<String>,
        aggregator_id: impl Into<String>,
        endpoint: Option<Url>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let region = region.into();
        let endpoint = match endpoint {
            Some(url) => url,
            None => Self::default_endpoint(&region)?,
        };
        let rpc = RpcClient::new(endpoint, API_VERSION, credentials, transport)?;
        Ok(Self::from_rpc(rpc, region, aggregator_id))
    }

    /// Wrap an already-built RPC client (caller picks endpoint and version).
    pub fn from_rpc(
        rpc: RpcClient,
        region: impl Into<String>,
        aggregator_id: impl Into<String>,
    ) -> Self {
        Self {
            rpc,
            region: region.into(),
            aggregator_id: aggregator_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// `https://config.{region}.aliyuncs.com/`
    pub fn default_endpoint(region: &str) -> Result<Url, Error> {
        Ok(Url::parse(&format!("https://config.{region}.aliyuncs.com/"))?)
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Override the page ceiling applied to each paginated fetch.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.rpc = self.rpc.with_max_pages(max_pages);
        self
    }

    pub fn aggregator_id(&self) -> &str {
        &self.aggregator_id
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Every VPC discovered by the aggregator, in server order.
    pub async fn list_vpcs(&self) -> Result<Vec<DiscoveredResource>, Error> {
        self.list_resources(VPC_RESOURCE_TYPE).await
    }

    /// Every discovered resource of `resource_type`, in server order.
    pub async fn list_resources(
        &self,
        resource_type: &str,
    ) -> Result<Vec<DiscoveredResource>, Error> {
        let fixed = RequestParams::new()
            .with("RegionId", self.region.as_str())
            .with("AggregatorId", self.aggregator_id.as_str())
            .with("ResourceType", resource_type)
            .with("MaxResults", self.page_size.to_string());

        let resources = self
            .rpc
            .fetch_all::<ListDiscoveredResourcesResponse>(LIST_RESOURCES, fixed)
            .await?;

        info!(
            aggregator = %self.aggregator_id,
            resource_type,
            count = resources.len(),
            "listed discovered resources"
        );
        Ok(resources)
    }
}
