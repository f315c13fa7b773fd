// ── IPAM pool allocation walk ──
//
// Outer pagination over pools, inner pagination over each pool's
// allocations, folded into one `ManagedIndex` as pages arrive. Pools are
// walked one at a time in server order so later pools overwrite earlier
// ones deterministically.

use futures_util::{TryStreamExt, pin_mut};
use tracing::{debug, info, warn};
use vpcaudit_api::ipam::types::{IpamPool, IpamPoolAllocation};
use vpcaudit_api::{CursorPage, Error, IpamClient};

use crate::model::{AllocationKind, AllocationRecord, ManagedIndex};

/// Walk every pool and fold its VPC allocations into a `ManagedIndex`.
///
/// A failure on any page, outer or inner, fails the whole walk; inner
/// failures name the pool they came from.
pub async fn build_managed_index(ipam: &IpamClient) -> Result<ManagedIndex, Error> {
    let mut index = ManagedIndex::new();
    let mut pool_count = 0_usize;

    let pools = ipam.pool_pages();
    pin_mut!(pools);

    while let Some(page) = pools.try_next().await? {
        for pool in page.into_items() {
            pool_count += 1;
            walk_pool(ipam, &pool, &mut index)
                .await
                .map_err(|source| Error::PoolAllocations {
                    pool_id: pool.ipam_pool_id.clone(),
                    source: Box::new(source),
                })?;
        }
    }

    info!(
        region = ipam.region(),
        pools = pool_count,
        managed = index.len(),
        "IPAM walk complete"
    );
    Ok(index)
}

async fn walk_pool(
    ipam: &IpamClient,
    pool: &IpamPool,
    index: &mut ManagedIndex,
) -> Result<(), Error> {
    let name = pool_display_name(pool);

    let pages = ipam.allocation_pages(&pool.ipam_pool_id);
    pin_mut!(pages);

    let mut folded = 0_usize;
    while let Some(page) = pages.try_next().await? {
        folded += fold_allocations(index, name, page.into_items());
    }

    debug!(pool = %pool.ipam_pool_id, name, vpcs = folded, "pool walked");
    Ok(())
}

/// Pools without a name are reported by id so the pool column is never blank.
fn pool_display_name(pool: &IpamPool) -> &str {
    pool.ipam_pool_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(&pool.ipam_pool_id)
}

/// Fold one page of allocations into `index`, keeping only VPCs.
/// Returns how many VPC allocations were recorded.
pub(crate) fn fold_allocations(
    index: &mut ManagedIndex,
    pool_name: &str,
    allocations: Vec<IpamPoolAllocation>,
) -> usize {
    let mut recorded = 0;
    for allocation in allocations {
        let record = AllocationRecord::from_api(allocation, pool_name);
        if record.kind != AllocationKind::Vpc {
            continue;
        }

        let previous = index.record(record.resource_id.as_str(), record.pool_name.as_str());
        if let Some(previous) = previous.filter(|p| *p != record.pool_name) {
            warn!(
                resource_id = %record.resource_id,
                previous_pool = %previous,
                pool = %record.pool_name,
                "VPC allocated from more than one IPAM pool; keeping the later pool"
            );
        }
        recorded += 1;
    }
    recorded
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn alloc(resource_id: &str, resource_type: &str) -> IpamPoolAllocation {
        IpamPoolAllocation {
            ipam_pool_allocation_id: None,
            resource_id: resource_id.into(),
            resource_type: resource_type.into(),
            cidr: None,
            resource_owner_id: None,
            resource_region_id: None,
        }
    }

    #[test]
    fn only_vpc_allocations_are_folded() {
        let mut index = ManagedIndex::new();

        let n = fold_allocations(
            &mut index,
            "prod",
            vec![alloc("vpc-1", "VPC"), alloc("custom-1", "Custom"), alloc("vpc-2", "VPC")],
        );

        assert_eq!(n, 2);
        assert_eq!(index.len(), 2);
        assert!(!index.contains("custom-1"));
    }

    #[test]
    fn later_pool_overwrites_earlier() {
        let mut index = ManagedIndex::new();

        fold_allocations(&mut index, "A", vec![alloc("v1", "VPC"), alloc("v2", "VPC")]);
        fold_allocations(&mut index, "B", vec![alloc("v1", "VPC")]);

        assert_eq!(index.pool_for("v1"), Some("B"));
        assert_eq!(index.pool_for("v2"), Some("A"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn unnamed_pool_falls_back_to_id() {
        let pool = |name: Option<&str>| IpamPool {
            ipam_pool_id: "ipam-pool-1".into(),
            ipam_pool_name: name.map(str::to_owned),
            ipam_scope_id: None,
            pool_region_id: None,
            status: None,
        };

        assert_eq!(pool_display_name(&pool(Some("prod"))), "prod");
        assert_eq!(pool_display_name(&pool(Some(""))), "ipam-pool-1");
        assert_eq!(pool_display_name(&pool(None)), "ipam-pool-1");
    }
}
