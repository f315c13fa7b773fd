//! Webhook delivery of the report. Failures are logged, never fatal.

use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use vpcaudit_api::{TransportConfig, WebhookClient};

/// Post `text` to `url`. Returns whether the webhook accepted it.
pub async fn send_report(url: &Url, text: &str, timeout: Duration) -> bool {
    let transport = TransportConfig::default().with_timeout(timeout);
    let client = match WebhookClient::new(url.clone(), &transport) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "could not build webhook client");
            return false;
        }
    };

    match client.send_text(text).await {
        Ok(()) => {
            info!("report delivered to webhook");
            true
        }
        Err(e) => {
            warn!(error = %e, "webhook delivery failed");
            false
        }
    }
}
