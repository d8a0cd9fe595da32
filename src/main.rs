//! Sick-Day Analysis - interactive report and headless CLI
//!
//! Without a subcommand the interactive window opens; `report` prints the
//! same analyses to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use sickday_stats::charts::StaticChartRenderer;
use sickday_stats::cli::{Cli, Command, GuiArgs, OutputFormat, ReportArgs};
use sickday_stats::data::DataLoader;
use sickday_stats::gui::{AppSettings, SickDayApp};
use sickday_stats::report::compute_report;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; RUST_LOG takes precedence over --verbose
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sickday_stats={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_report(args: ReportArgs) -> Result<()> {
    let thresholds = args
        .thresholds
        .thresholds()
        .context("Invalid thresholds")?;
    let loader = DataLoader::new(&args.data.encoding)?;
    let dataset = loader
        .load_file(&args.data.data)
        .with_context(|| format!("Unusable data file {}", args.data.data.display()))?;

    let report = compute_report(&dataset, &thresholds);
    match args.format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if let Some(dir) = &args.chart_dir {
        let written = StaticChartRenderer::export_report_charts(&report, dir)
            .with_context(|| format!("Failed to write charts to {}", dir.display()))?;
        for path in written {
            eprintln!("Chart written: {}", path.display());
        }
    }
    Ok(())
}

fn run_gui(args: GuiArgs) -> Result<()> {
    let settings = AppSettings {
        data_path: args.data.data,
        loader: DataLoader::new(&args.data.encoding)?,
        thresholds: args
            .thresholds
            .thresholds()
            .context("Invalid thresholds")?,
    };

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Sick-Day Analysis"),
        ..Default::default()
    };

    eframe::run_native(
        "Sick-Day Analysis",
        options,
        Box::new(|cc| Ok(Box::new(SickDayApp::new(cc, settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Window failed: {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.unwrap_or_else(|| Command::Gui(GuiArgs::default())) {
        Command::Gui(args) => run_gui(args),
        Command::Report(args) => run_report(args),
    }
}
