//! CLI argument definitions for Bandtrack.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scan` | Compute Bollinger Bands for ad-hoc symbols |
//! | `update` | Refresh the tracker worksheets for watched categories |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--mock` | `false` | Deterministic offline data, no network |
//! | `--period` | `200` | Band window length |
//! | `--num-std` | `2.0` | Band width in standard deviations |
//! | `--batch-size` | `20` | Symbols fetched per batch |
//! | `--delay-ms` | `500` | Gap between upstream requests |
//! | `--max-retries` | `3` | Retries after the initial fetch attempt |
//! | `--retry-delay-ms` | `2000` | Fixed delay between retries |
//!
//! # Examples
//!
//! ```bash
//! # Ad-hoc scan printed as a table
//! bandtrack scan TCS INFY RELIANCE
//!
//! # Hourly scan as JSON
//! bandtrack scan TCS --timeframe hourly --format json --pretty
//!
//! # Refresh every category and timeframe
//! bandtrack update --spreadsheet-id 1AbC...
//!
//! # Offline dry run
//! bandtrack update --mock
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// 📈 Bandtrack - Bollinger Band tracker for NSE equities
///
/// Batch-fetches market data, computes 200-period Bollinger Bands, and
/// writes the results to Google Sheets with a local CSV fallback.
#[derive(Debug, Parser)]
#[command(
    name = "bandtrack",
    author,
    version,
    about = "Bollinger Band tracker for NSE equities",
    long_about = "Bandtrack scans NSE watchlists and keeps per-category Bollinger Band \
worksheets up to date. Features include:\n\
\n\
  • 200-period bands over daily and hourly series\n\
  • Paced, retried batch fetching from Yahoo Finance\n\
  • Whole-worksheet Google Sheets updates\n\
  • Timestamped CSV fallback when the sheet write fails\n\
\n\
Use 'bandtrack <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Serve deterministic offline data instead of calling providers.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Band window length in bars.
    #[arg(long, global = true, default_value_t = 200)]
    pub period: usize,

    /// Band width in standard deviations.
    #[arg(long, global = true, default_value_t = 2.0)]
    pub num_std: f64,

    /// Symbols fetched per batch.
    #[arg(long, global = true, default_value_t = 20)]
    pub batch_size: usize,

    /// Minimum gap between upstream requests, in milliseconds.
    #[arg(long, global = true, default_value_t = 500)]
    pub delay_ms: u64,

    /// Retries after the initial fetch attempt.
    #[arg(long, global = true, default_value_t = 3)]
    pub max_retries: u32,

    /// Fixed delay between retries, in milliseconds.
    #[arg(long, global = true, default_value_t = 2000)]
    pub retry_delay_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Timeframe selector for the `scan` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeframeArg {
    /// Daily bars over a 400-day lookback.
    Daily,
    /// Hourly bars over the provider's 60-day cap.
    Hourly,
}

/// Timeframe selector for the `update` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeframeSelect {
    Daily,
    Hourly,
    /// Refresh both the daily and hourly worksheets.
    Both,
}

/// Watchlist category selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Nifty50,
    Smallcap100,
    Midcap100,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// 🔍 Compute Bollinger Bands for ad-hoc symbols.
    ///
    /// Prints the assembled rows without touching any spreadsheet.
    ///
    /// # Examples
    ///
    ///   bandtrack scan TCS INFY
    ///   bandtrack scan RELIANCE --timeframe hourly --format json
    Scan(ScanArgs),

    /// 📝 Refresh the tracker worksheets for watched categories.
    ///
    /// Reads the per-category watchlists, scans every symbol, and replaces
    /// the matching output worksheets. Falls back to timestamped CSV files
    /// when the sheet write fails.
    ///
    /// # Examples
    ///
    ///   bandtrack update --spreadsheet-id 1AbC...
    ///   bandtrack update --timeframe daily --category nifty50
    ///   bandtrack update --mock
    Update(UpdateArgs),
}

/// Arguments for the `scan` command.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// One or more NSE symbols (e.g., TCS, INFY, RELIANCE).
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    /// Bar timeframe to scan.
    #[arg(long, value_enum, default_value_t = TimeframeArg::Daily)]
    pub timeframe: TimeframeArg,
}

/// Arguments for the `update` command.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Timeframes to refresh.
    #[arg(long, value_enum, default_value_t = TimeframeSelect::Both)]
    pub timeframe: TimeframeSelect,

    /// Categories to refresh. Repeat the flag for several; defaults to all.
    #[arg(long = "category", value_enum)]
    pub categories: Vec<CategoryArg>,

    /// Target spreadsheet id. Falls back to GSHEETS_SPREADSHEET_ID.
    #[arg(long)]
    pub spreadsheet_id: Option<String>,

    /// Directory for CSV fallback files.
    #[arg(long, default_value = "backups")]
    pub backup_dir: PathBuf,
}
