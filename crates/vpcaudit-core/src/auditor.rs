// ── Audit orchestration ──
//
// Owns the API clients built from one `AuditConfig`. A run fetches the
// inventory and walks IPAM concurrently, then reconciles.

use tracing::{info, warn};
use vpcaudit_api::{ConfigAuditClient, IpamClient, TlsMode, TransportConfig};

use crate::config::{AuditConfig, ReportFilter, TlsVerification};
use crate::error::CoreError;
use crate::model::{ManagedIndex, VpcRecord};
use crate::reconcile::reconcile;
use crate::report::Report;
use crate::walker::build_managed_index;

/// Runs audits against one aggregator and (optionally) one IPAM region.
pub struct Auditor {
    inventory: ConfigAuditClient,
    ipam: Option<IpamClient>,
    filter: ReportFilter,
    deadline: Option<std::time::Duration>,
}

impl Auditor {
    /// Build the API clients described by `config`.
    pub fn new(config: &AuditConfig) -> Result<Self, CoreError> {
        let transport = transport_config(config);

        let inventory = ConfigAuditClient::new(
            config.config_audit.access_key.clone(),
            config.region.clone(),
            config.aggregator_id.clone(),
            config.config_audit.endpoint.clone(),
            &transport,
        )?
        .with_page_size(config.page_size)
        .with_max_pages(config.max_pages);

        let ipam = match &config.ipam {
            Some(settings) => Some(
                IpamClient::new(
                    settings.access_key.clone(),
                    config.ipam_region(),
                    settings.endpoint.clone(),
                    &transport,
                )?
                .with_page_size(config.page_size)
                .with_max_pages(config.max_pages),
            ),
            None => None,
        };

        Ok(Self::from_clients(inventory, ipam, config.filter.clone())
            .with_deadline(config.deadline))
    }

    /// Assemble from pre-built clients.
    pub fn from_clients(
        inventory: ConfigAuditClient,
        ipam: Option<IpamClient>,
        filter: ReportFilter,
    ) -> Self {
        Self {
            inventory,
            ipam,
            filter,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<std::time::Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn filter(&self) -> &ReportFilter {
        &self.filter
    }

    // ── Run ──────────────────────────────────────────────────────────

    /// Fetch both sources, then reconcile. Either fetch failing fails the run.
    pub async fn run(&self) -> Result<Report, CoreError> {
        let (records, index) = match self.deadline {
            Some(limit) => tokio::time::timeout(limit, self.fetch())
                .await
                .map_err(|_| CoreError::Timeout {
                    timeout_secs: limit.as_secs(),
                })??,
            None => self.fetch().await?,
        };

        let report = reconcile(&records, &index, &self.filter);
        info!(
            total = report.summary.total_vpcs,
            active = report.summary.active_vpcs,
            managed = report.summary.ipam_managed_vpcs,
            reported = report.summary.filtered_vpcs,
            "audit complete"
        );
        Ok(report)
    }

    async fn fetch(&self) -> Result<(Vec<VpcRecord>, ManagedIndex), CoreError> {
        let inventory = async {
            let resources = self.inventory.list_vpcs().await?;
            Ok::<_, CoreError>(resources.into_iter().map(VpcRecord::from).collect::<Vec<_>>())
        };
        let managed = async {
            match &self.ipam {
                Some(ipam) => Ok::<_, CoreError>(build_managed_index(ipam).await?),
                None => {
                    warn!("IPAM credentials not configured; every VPC will report as unmanaged");
                    Ok(ManagedIndex::new())
                }
            }
        };

        tokio::try_join!(inventory, managed)
    }
}

fn transport_config(config: &AuditConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}
