// Audit result plus its text renderings shared by stdout and the webhook.

use serde::Serialize;

use crate::model::{ReconciledRow, ReportSummary};

/// Rows in inventory order plus run-level counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub rows: Vec<ReconciledRow>,
    pub summary: ReportSummary,
}

impl Report {
    /// `Found N VPC resources (active: A, IPAM-managed: M, matched filter: F)`
    pub fn summary_line(&self) -> String {
        let s = &self.summary;
        format!(
            "Found {} VPC resources (active: {}, IPAM-managed: {}, matched filter: {})",
            s.total_vpcs, s.active_vpcs, s.ipam_managed_vpcs, s.filtered_vpcs
        )
    }

    /// Webhook message body: a counters header followed by the rendered table.
    pub fn notification_text(&self, table: &str) -> String {
        let s = &self.summary;
        format!(
            "VPC resource audit\n\
             Total VPCs: {}\n\
             Active VPCs: {}\n\
             IPAM-managed: {}\n\
             Matched filter: {}\n\n{table}",
            s.total_vpcs, s.active_vpcs, s.ipam_managed_vpcs, s.filtered_vpcs
        )
    }
}
