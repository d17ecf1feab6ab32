use clap::{Args, Parser, Subcommand};
use riskwatch_types::binning::BinningStrategy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "riskwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Data drift reports for tabular health risk datasets", long_about = None)]
pub struct Cli {
    /// Log filter directive, e.g. `debug` or `riskwatch_drift=debug`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare a current snapshot against a reference snapshot
    Report(ReportArgs),

    /// Check a snapshot against a schema contract
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Reference (baseline) CSV file
    #[arg(short, long)]
    pub reference: PathBuf,

    /// Current CSV file
    #[arg(short, long)]
    pub current: PathBuf,

    /// Output JSON report; defaults to RISKWATCH_REPORT_PATH
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// KS p-value threshold
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Number of PSI bins
    #[arg(long)]
    pub bins: Option<usize>,

    /// PSI binning strategy (equal_width, quantile)
    #[arg(long)]
    pub binning: Option<BinningStrategy>,

    /// Fail on the first column that cannot be compared
    #[arg(long)]
    pub strict: bool,

    /// YAML settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// YAML schema contract both snapshots must satisfy
    #[arg(long)]
    pub contract: Option<PathBuf>,

    /// Print the report to stdout
    #[arg(long)]
    pub print: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// CSV file to validate
    #[arg(short, long)]
    pub data: PathBuf,

    /// YAML schema contract
    #[arg(long)]
    pub contract: PathBuf,
}
