//! Coffee EDA - CSV Data Analysis & Interactive Chart Viewer
//!
//! Runs the cleaning and analysis pipeline, prints the tabular summaries and
//! opens the chart viewer.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use coffee_eda::charts::StaticChartRenderer;
use coffee_eda::gui::EdaApp;
use coffee_eda::{DataLoader, EdaConfig, EdaReport};
use eframe::egui;
use polars::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Directory used by the viewer's export button when `--export` is not given
const DEFAULT_EXPORT_DIR: &str = "charts";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory analysis of the CQI arabica coffee review dataset",
    long_about = "Loads the review CSV, drops the row-number column, normalizes column names,\n\
                  patches known-bad altitude rows and reports summaries, distributions and\n\
                  correlations.\n\n\
                  EXAMPLES:\n  \
                  coffee-eda arabica_data_cleaned.csv\n  \
                  coffee-eda arabica_data_cleaned.csv --no-gui --export charts/"
)]
struct Args {
    /// Path to the review CSV file
    input: PathBuf,

    /// JSON file overriding the default analysis settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write every chart as PNG into this directory
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Do not open the interactive viewer
    #[arg(long)]
    no_gui: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors and skip the console report
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn section(title: &str) {
    println!("\n=== {title} ===");
}

fn print_raw_overview(df: &DataFrame) {
    section("Shape");
    println!("{:?}", df.shape());

    section("Head");
    println!("{}", df.head(Some(5)));

    section("Dtypes");
    for (name, dtype) in DataLoader::get_schema(df) {
        println!("{name:<24} {dtype}");
    }
}

fn print_report(report: &EdaReport, config: &EdaConfig) -> Result<()> {
    section("Missing values");
    println!("{}", report.summary.null_counts_frame()?);

    section("Numeric columns");
    println!("{}", report.summary.numeric_frame()?);

    section("Altitude outliers");
    if report.suspect_rows.is_empty() {
        println!("none above {} m", config.altitude_outlier_threshold);
    } else {
        println!(
            "rows above {} m before patching: {:?}",
            config.altitude_outlier_threshold, report.suspect_rows
        );
    }
    for patch in &config.altitude_patches {
        println!("row {:>5} -> {} m", patch.row, patch.value);
    }

    section(&config.score_column);
    println!("{}", report.score_stats.to_frame()?);

    section("Sensory correlation");
    println!("{}", report.correlation.to_frame()?);

    section("Countries of origin");
    println!("{}", report.countries.join(", "));

    for analysis in [&report.by_country, &report.by_processing] {
        section(&format!("Reviews by {}", analysis.column));
        for count in &analysis.counts {
            println!("{:<32} {}", count.group, count.count);
        }
    }

    for matrix in &report.subset_correlations {
        section(&format!("Correlation: {}", matrix.label));
        println!("{}", matrix.to_frame()?);
    }

    for comparison in &report.densities {
        section(&format!("Density: {} ({} reviews)", comparison.subset, comparison.rows));
        for curve in &comparison.curves {
            let peak = curve.peak().map(|(x, _)| x).unwrap_or(f64::NAN);
            println!(
                "{:<12} bandwidth {:.4}  peak at {:.2}",
                curve.label, curve.bandwidth, peak
            );
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    let config = match &args.config {
        Some(path) => EdaConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EdaConfig::default(),
    };
    debug!("Config: {:?}", config);

    // Show every column when printing frames
    std::env::set_var("POLARS_FMT_MAX_COLS", "-1");

    let raw = DataLoader::load_csv(&args.input)?;
    if !args.quiet {
        print_raw_overview(&raw);
    }

    let (_, report) = EdaReport::from_raw(raw, &args.input.display().to_string(), &config)?;

    if !args.quiet {
        print_report(&report, &config)?;
    }

    if let Some(dir) = &args.export {
        let written = StaticChartRenderer::export_report(&report, dir)?;
        info!("Wrote {} charts", written.len());
    }

    if args.no_gui {
        return Ok(());
    }

    let export_dir = args
        .export
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR));

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Coffee EDA"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Coffee EDA",
        options,
        Box::new(move |cc| {
            Ok(Box::new(EdaApp::new(
                cc,
                args.input.clone(),
                export_dir,
                config,
                report,
            )))
        }),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
