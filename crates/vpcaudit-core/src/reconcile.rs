// ── Inventory / IPAM reconciliation ──
//
// Pure fold over the inventory. Counters are tallied before filters so the
// totals describe the whole fleet, not just the rows shown.

use crate::config::ReportFilter;
use crate::model::{ManagedIndex, ReconciledRow, ReportSummary, VpcRecord};
use crate::report::Report;

/// Cross-reference `records` against `index` and apply `filter`.
///
/// Non-VPC records are ignored entirely. Rows keep the order of `records`.
/// `ipam_managed_vpcs` is the size of `index`, whether or not the managed
/// VPCs appear in the inventory.
pub fn reconcile(records: &[VpcRecord], index: &ManagedIndex, filter: &ReportFilter) -> Report {
    let mut rows = Vec::new();
    let mut summary = ReportSummary {
        ipam_managed_vpcs: index.len(),
        ..ReportSummary::default()
    };

    for record in records.iter().filter(|r| r.is_vpc()) {
        summary.total_vpcs += 1;
        if record.status.is_available() {
            summary.active_vpcs += 1;
        }

        if filter.is_excluded(record.account_id) {
            continue;
        }

        let pool = index.pool_for(&record.resource_id);
        if filter.unmanaged_only && pool.is_some() {
            continue;
        }

        rows.push(ReconciledRow::new(record, pool));
        summary.filtered_vpcs += 1;
    }

    Report { rows, summary }
}
