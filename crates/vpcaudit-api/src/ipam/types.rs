// Wire types for the VPC IPAM API (version 2023-02-28).

use serde::Deserialize;

use crate::pagination::CursorPage;

/// Allocation resource type for VPCs.
pub const VPC_ALLOCATION_TYPE: &str = "VPC";

/// Response of `ListIpamPools`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListIpamPoolsResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub ipam_pools: Vec<IpamPool>,
    #[serde(default)]
    pub next_token: Option<String>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpamPool {
    pub ipam_pool_id: String,
    #[serde(default)]
    pub ipam_pool_name: Option<String>,
    #[serde(default)]
    pub ipam_scope_id: Option<String>,
    #[serde(default)]
    pub pool_region_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Response of `ListIpamPoolAllocations`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListIpamPoolAllocationsResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub ipam_pool_allocations: Vec<IpamPoolAllocation>,
    #[serde(default)]
    pub next_token: Option<String>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpamPoolAllocation {
    #[serde(default)]
    pub ipam_pool_allocation_id: Option<String>,
    #[serde(default)]
    pub resource_id: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub cidr: Option<String>,
    #[serde(default)]
    pub resource_owner_id: Option<i64>,
    #[serde(default)]
    pub resource_region_id: Option<String>,
}

impl CursorPage for ListIpamPoolsResponse {
    type Item = IpamPool;

    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }

    fn into_items(self) -> Vec<IpamPool> {
        self.ipam_pools
    }
}

impl CursorPage for ListIpamPoolAllocationsResponse {
    type Item = IpamPoolAllocation;

    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }

    fn into_items(self) -> Vec<IpamPoolAllocation> {
        self.ipam_pool_allocations
    }
}
