// vpcaudit-api: Async Rust client for signed, cursor-paginated cloud RPC APIs
// (Config-audit aggregator inventory + VPC IPAM) and the report webhook.

pub mod config_audit;
pub mod error;
pub mod ipam;
pub mod pagination;
pub mod rpc;
pub mod signer;
pub mod transport;
pub mod webhook;

pub use config_audit::ConfigAuditClient;
pub use error::Error;
pub use ipam::IpamClient;
pub use pagination::{CursorPage, DEFAULT_MAX_PAGES};
pub use rpc::RpcClient;
pub use signer::{AccessKey, RequestParams, SignedQuery};
pub use transport::{TlsMode, TransportConfig};
pub use webhook::WebhookClient;
