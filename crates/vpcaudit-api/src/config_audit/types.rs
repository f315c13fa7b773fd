// Wire types for the Config-audit aggregator API (version 2020-09-07).

use serde::Deserialize;

use crate::pagination::CursorPage;

/// Response of `ListAggregateDiscoveredResources`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListDiscoveredResourcesResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    pub discovered_resource_profiles: DiscoveredResourceProfiles,
}

/// The page wrapper: records plus the continuation token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiscoveredResourceProfiles {
    #[serde(default)]
    pub discovered_resource_profile_list: Vec<DiscoveredResource>,
    #[serde(default)]
    pub next_token: Option<String>,
    #[serde(default)]
    pub max_results: Option<u32>,
}

/// One discovered resource as reported by the aggregator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiscoveredResource {
    pub account_id: i64,
    pub resource_id: String,
    #[serde(default)]
    pub resource_name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub resource_status: String,
    pub resource_type: String,
    #[serde(default)]
    pub resource_creation_time: Option<i64>,
}

impl CursorPage for ListDiscoveredResourcesResponse {
    type Item = DiscoveredResource;

    fn next_token(&self) -> Option<&str> {
        self.discovered_resource_profiles.next_token.as_deref()
    }

    fn into_items(self) -> Vec<DiscoveredResource> {
        self.discovered_resource_profiles
            .discovered_resource_profile_list
    }
}
