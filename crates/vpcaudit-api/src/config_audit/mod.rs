// Config-audit (aggregator) API client.
//
// Enumerates resources discovered across every member account of a
// Config aggregator. Only the VPC resource type is used by the audit.

pub mod client;
pub mod types;

pub use client::ConfigAuditClient;
