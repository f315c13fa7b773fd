//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders the audit report in the format selected by `--output`. Table
//! uses `tabled`, structured formats use serde, plain emits one resource id
//! per line.

use std::collections::HashMap;
use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use vpcaudit_core::{ReconciledRow, Report};

use crate::cli::OutputFormat;

// ── Row type ─────────────────────────────────────────────────────────

#[derive(Tabled)]
struct VpcRow {
    #[tabled(rename = "AccountID")]
    account: String,
    #[tabled(rename = "ResourceID")]
    resource_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "ManagingPool")]
    managing_pool: String,
}

impl VpcRow {
    fn new(row: &ReconciledRow, aliases: Option<&HashMap<i64, String>>) -> Self {
        let account = aliases
            .and_then(|a| a.get(&row.account_id))
            .cloned()
            .unwrap_or_else(|| row.account_id.to_string());
        Self {
            account,
            resource_id: row.resource_id.clone(),
            name: row.name.clone(),
            region: row.region.clone(),
            status: row.status.to_string(),
            managing_pool: row.managing_pool.clone(),
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render the report in the chosen format.
///
/// `aliases` replaces raw account ids in the table view only; structured
/// formats always carry the numeric id.
pub fn render_report(
    format: OutputFormat,
    report: &Report,
    aliases: Option<&HashMap<i64, String>>,
) -> String {
    match format {
        OutputFormat::Table => format!(
            "{}\n\n{}",
            report.summary_line(),
            rows_table(&report.rows, aliases).with(Style::rounded())
        ),
        OutputFormat::Json => render_json(report, false),
        OutputFormat::JsonCompact => render_json(report, true),
        OutputFormat::Yaml => render_yaml(report),
        OutputFormat::Plain => report
            .rows
            .iter()
            .map(|r| r.resource_id.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Borderless table for chat messages, where box-drawing glyphs wrap badly.
pub fn notification_table(report: &Report, aliases: Option<&HashMap<i64, String>>) -> String {
    rows_table(&report.rows, aliases)
        .with(Style::blank())
        .to_string()
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn rows_table(rows: &[ReconciledRow], aliases: Option<&HashMap<i64, String>>) -> Table {
    Table::new(rows.iter().map(|r| VpcRow::new(r, aliases)))
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.expect("serialization should not fail")
}

/// YAML output.
pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}
