// ── Domain model ──
//
// Canonical types the reconciler works on, decoupled from the wire shapes
// in `vpcaudit_api`. Conversions live at the bottom of this file.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};
use vpcaudit_api::config_audit::client::VPC_RESOURCE_TYPE;
use vpcaudit_api::config_audit::types::DiscoveredResource;
use vpcaudit_api::ipam::types::{IpamPoolAllocation, VPC_ALLOCATION_TYPE};

/// Pool column value for VPCs with no IPAM allocation.
pub const UNMANAGED: &str = "unmanaged";

// ── VPC inventory ───────────────────────────────────────────────────

/// Lifecycle status of a VPC as reported by the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VpcStatus {
    Available,
    Other(String),
}

impl VpcStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => "Available",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for VpcStatus {
    fn from(raw: &str) -> Self {
        if raw == "Available" {
            Self::Available
        } else {
            Self::Other(raw.to_owned())
        }
    }
}

impl fmt::Display for VpcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VpcStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One resource from the Config-audit inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpcRecord {
    pub account_id: i64,
    pub resource_id: String,
    pub name: String,
    pub region: String,
    pub status: VpcStatus,
    pub resource_type: String,
}

impl VpcRecord {
    /// Only `ACS::VPC::VPC` records take part in reconciliation.
    pub fn is_vpc(&self) -> bool {
        self.resource_type == VPC_RESOURCE_TYPE
    }
}

// ── IPAM allocations ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationKind {
    Vpc,
    Other(String),
}

/// An IPAM allocation, denormalized with the name of its owning pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRecord {
    pub resource_id: String,
    pub kind: AllocationKind,
    pub pool_name: String,
}

impl AllocationRecord {
    pub fn from_api(allocation: IpamPoolAllocation, pool_name: &str) -> Self {
        let kind = if allocation.resource_type == VPC_ALLOCATION_TYPE {
            AllocationKind::Vpc
        } else {
            AllocationKind::Other(allocation.resource_type)
        };
        Self {
            resource_id: allocation.resource_id,
            kind,
            pool_name: pool_name.to_owned(),
        }
    }
}

/// VPC resource id → name of the IPAM pool that allocated it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedIndex {
    pools: HashMap<String, String>,
}

impl ManagedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `resource_id` to `pool_name`, returning the pool it was mapped to
    /// before, if any. Later writes win.
    pub fn record(
        &mut self,
        resource_id: impl Into<String>,
        pool_name: impl Into<String>,
    ) -> Option<String> {
        self.pools.insert(resource_id.into(), pool_name.into())
    }

    pub fn pool_for(&self, resource_id: &str) -> Option<&str> {
        self.pools.get(resource_id).map(String::as_str)
    }

    pub fn contains(&self, resource_id: &str) -> bool {
        self.pools.contains_key(resource_id)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ManagedIndex {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (resource_id, pool_name) in iter {
            index.record(resource_id, pool_name);
        }
        index
    }
}

// ── Report rows ─────────────────────────────────────────────────────

/// One reported VPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledRow {
    pub account_id: i64,
    pub resource_id: String,
    pub name: String,
    pub region: String,
    pub status: VpcStatus,
    /// Managing pool name, or [`UNMANAGED`].
    pub managing_pool: String,
    /// Whether the VPC was found in the managed index. Kept separately so a
    /// pool literally named `unmanaged` still counts as managed.
    pub managed: bool,
}

impl ReconciledRow {
    /// Row for `record`, managed by `pool` if it was found in the index.
    pub fn new(record: &VpcRecord, pool: Option<&str>) -> Self {
        Self {
            account_id: record.account_id,
            resource_id: record.resource_id.clone(),
            name: record.name.clone(),
            region: record.region.clone(),
            status: record.status.clone(),
            managing_pool: pool.unwrap_or(UNMANAGED).to_owned(),
            managed: pool.is_some(),
        }
    }

    pub fn is_managed(&self) -> bool {
        self.managed
    }
}

/// Run-level counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// In-scope VPCs seen, before any filter.
    pub total_vpcs: usize,
    /// Of those, VPCs whose status is `Available`.
    pub active_vpcs: usize,
    /// Size of the whole managed index, across every pool.
    pub ipam_managed_vpcs: usize,
    /// Rows emitted after filters.
    pub filtered_vpcs: usize,
}

// ── Conversions ─────────────────────────────────────────────────────

impl From<DiscoveredResource> for VpcRecord {
    fn from(r: DiscoveredResource) -> Self {
        Self {
            account_id: r.account_id,
            status: VpcStatus::from(r.resource_status.as_str()),
            resource_id: r.resource_id,
            name: r.resource_name,
            region: r.region,
            resource_type: r.resource_type,
        }
    }
}
