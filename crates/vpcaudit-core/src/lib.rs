// vpcaudit-core: Reconciles a Config-audit VPC inventory against IPAM pool
// allocations and produces the governance report consumed by the CLI.

pub mod auditor;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod report;
pub mod walker;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auditor::Auditor;
pub use cache::AliasCache;
pub use config::{AuditConfig, IpamSettings, ReportFilter, ServiceCredentials, TlsVerification};
pub use error::CoreError;
pub use model::{
    AllocationKind, AllocationRecord, ManagedIndex, ReconciledRow, ReportSummary, UNMANAGED,
    VpcRecord, VpcStatus,
};
pub use reconcile::reconcile;
pub use report::Report;
pub use walker::build_managed_index;

// Credential type used in `AuditConfig`.
pub use vpcaudit_api::AccessKey;
