//! Clap derive structures for the `vpcaudit` CLI.
//!
//! Defines the command tree and global flags. Also compiled by `build.rs`
//! for man page generation, so it may only depend on clap, clap_complete and
//! humantime.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vpcaudit -- find VPCs that escaped IPAM governance
#[derive(Debug, Parser)]
#[command(
    name = "vpcaudit",
    version,
    about = "Audit VPCs across a Config aggregator for IPAM governance",
    long_about = "Lists every VPC discovered by a Config-audit aggregator, cross-references\n\
        each against IPAM pool allocations, and reports which VPCs are not\n\
        managed by any IPAM pool.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "VPCAUDIT_CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Per-request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Summary line plus a table (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// One resource id per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the audit and report VPCs with their managing IPAM pool
    Check(CheckArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Check ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Account ids to leave out of the report (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "ID,...")]
    pub exclude: Vec<i64>,

    /// Only report VPCs that no IPAM pool manages
    #[arg(long)]
    pub unmanaged: bool,

    /// Webhook URL to post the report to
    #[arg(long, value_name = "URL")]
    pub webhook: Option<String>,

    /// Region of the Config aggregator (overrides config)
    #[arg(long)]
    pub region: Option<String>,

    /// Config aggregator id (overrides config)
    #[arg(long)]
    pub aggregator: Option<String>,

    /// Deadline for the whole audit, e.g. "90s" or "5m"
    #[arg(long, value_parser = humantime::parse_duration)]
    pub deadline: Option<Duration>,

    /// Show account aliases instead of raw ids in the table
    #[arg(long)]
    pub aliases: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
