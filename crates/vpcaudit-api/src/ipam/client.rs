use futures_util::Stream;
use url::Url;

use super::types::{ListIpamPoolAllocationsResponse, ListIpamPoolsResponse};
use crate::error::Error;
use crate::rpc::RpcClient;
use crate::signer::{AccessKey, RequestParams};
use crate::transport::TransportConfig;

/// API version of the VPC IPAM service.
pub const API_VERSION: &str = "2023-02-28";

pub const LIST_POOLS: &str = "ListIpamPools";
pub const LIST_POOL_ALLOCATIONS: &str = "ListIpamPoolAllocations";

/// Default `MaxResults` per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Async client for the VPC IPAM API.
pub struct IpamClient {
    rpc: RpcClient,
    region: String,
    page_size: u32,
}

impl IpamClient {
    /// Build a client against the regional public endpoint, or `endpoint`
    /// when given.
    pub fn new(
        credentials: AccessKey,
        region: impl Into<String>,
        endpoint: Option<Url>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let region = region.into();
        let endpoint = match endpoint {
            Some(url) => url,
            None => Self::default_endpoint(&region)?,
        };
        let rpc = RpcClient::new(endpoint, API_VERSION, credentials, transport)?;
        Ok(Self::from_rpc(rpc, region))
    }

    /// Wrap an already-built RPC client.
    pub fn from_rpc(rpc: RpcClient, region: impl Into<String>) -> Self {
        Self {
            rpc,
            region: region.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// `https://vpcipam.{region}.aliyuncs.com/`
    pub fn default_endpoint(region: &str) -> Result<Url, Error> {
        Ok(Url::parse(&format!("https://vpcipam.{region}.aliyuncs.com/"))?)
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

    pub fn region(&self) -> &str {
        &self.region
    }

    fn base_params(&self) -> RequestParams {
        RequestParams::new()
            .with("RegionId", self.region.as_str())
            .with("MaxResults", self.page_size.to_string())
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Pages of IPAM pools, in server order.
    pub fn pool_pages(&self) -> impl Stream<Item = Result<ListIpamPoolsResponse, Error>> {
        self.rpc.pages(LIST_POOLS, self.base_params())
    }

    /// Pages of one pool's allocations, in server order.
    pub fn allocation_pages(
        &self,
        pool_id: &str,
    ) -> impl Stream<Item = Result<ListIpamPoolAllocationsResponse, Error>> {
        self.rpc.pages(
            LIST_POOL_ALLOCATIONS,
            self.base_params().with("IpamPoolId", pool_id),
        )
    }
}
