//! CLI argument parsing for sickday-stats

use crate::config::{
    ConfigError, Thresholds, DEFAULT_AGE, DEFAULT_ALPHA, DEFAULT_DATA_PATH, DEFAULT_ENCODING,
    DEFAULT_WORK_DAYS,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for the headless report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    Text,
    /// JSON for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "sickday-stats")]
#[command(version)]
#[command(about = "Tests whether sick-day usage differs by gender and age group", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive report window (default)
    Gui(GuiArgs),
    /// Print the report for a CSV file without opening a window
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// CSV export with the packed "sick days, age, gender" column
    #[arg(long = "data", value_name = "PATH", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Text encoding of the CSV file
    #[arg(long = "encoding", value_name = "LABEL", default_value = DEFAULT_ENCODING)]
    pub encoding: String,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct ThresholdArgs {
    /// Sick-day threshold: count employees with strictly more sick days
    #[arg(long = "work-days", value_name = "DAYS", default_value_t = DEFAULT_WORK_DAYS)]
    pub work_days: u32,

    /// Age threshold: older group is strictly above this age
    #[arg(long = "age", value_name = "YEARS", default_value_t = DEFAULT_AGE)]
    pub age: u32,

    /// Significance level, strictly between 0 and 1
    #[arg(long = "alpha", value_name = "ALPHA", default_value_t = DEFAULT_ALPHA)]
    pub alpha: f64,
}

impl ThresholdArgs {
    pub fn thresholds(&self) -> Result<Thresholds, ConfigError> {
        Thresholds::new(self.work_days, self.age, self.alpha)
    }
}

#[derive(Args, Debug, Clone)]
pub struct GuiArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

impl Default for GuiArgs {
    fn default() -> Self {
        Self {
            data: DataArgs {
                data: PathBuf::from(DEFAULT_DATA_PATH),
                encoding: DEFAULT_ENCODING.to_string(),
            },
            thresholds: ThresholdArgs {
                work_days: DEFAULT_WORK_DAYS,
                age: DEFAULT_AGE,
                alpha: DEFAULT_ALPHA,
            },
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Also write one PNG bar chart per analysis into this directory
    #[arg(long = "chart-dir", value_name = "DIR")]
    pub chart_dir: Option<PathBuf>,
}
