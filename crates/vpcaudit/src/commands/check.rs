//! `check`: run the audit, print the report, optionally notify.

use std::collections::HashMap;

use futures_util::future::join_all;
use tracing::debug;

use vpcaudit_core::{AliasCache, Auditor, Report};

use crate::cli::{CheckArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::notify;
use crate::output;

pub async fn handle(args: CheckArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let plan = config::check_plan(global, &args)?;
    debug!(
        region = %plan.audit.region,
        aggregator = %plan.audit.aggregator_id,
        ipam = plan.audit.ipam.is_some(),
        "starting audit"
    );

    let auditor = Auditor::new(&plan.audit)?;
    let report = auditor.run().await?;

    let aliases = if args.aliases {
        Some(resolve_aliases(&report).await)
    } else {
        None
    };

    let rendered = output::render_report(global.output, &report, aliases.as_ref());
    output::print_output(&rendered, global.quiet);

    if let Some(ref url) = plan.webhook {
        let table = output::notification_table(&report, aliases.as_ref());
        let text = report.notification_text(&table);
        if notify::send_report(url, &text, config::webhook_timeout(&plan)).await && !global.quiet {
            eprintln!("Report sent to webhook");
        }
    }

    Ok(())
}

/// Alias for every account in the report, looked up concurrently.
async fn resolve_aliases(report: &Report) -> HashMap<i64, String> {
    let cache = AliasCache::new();
    let lookups = report.rows.iter().map(|row| {
        let cache = &cache;
        async move { (row.account_id, cache.alias(row.account_id).await) }
    });
    join_all(lookups).await.into_iter().collect()
}
