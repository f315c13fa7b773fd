// VPC IPAM API client.
//
// Pools and their allocations, each independently cursor-paginated.
// The two-level walk that folds allocations into an index lives in
// `vpcaudit-core`; this module only exposes the page streams.

pub mod client;
pub mod types;

pub use client::IpamClient;
