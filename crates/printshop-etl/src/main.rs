//! CLI entry point for the print-shop jobs ETL pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use printshop_etl::{EtlConfig, EtlConfigBuilder, Pipeline, PipelineOutput, RunSummary};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Print-shop jobs ETL pipeline",
    long_about = "Extracts print-shop job records, imputes missing values, derives \
                  reporting features and writes the processed dataset as CSV.\n\n\
                  EXAMPLES:\n  \
                  # Process synthetic sample data into data/processed/processed_jobs.csv\n  \
                  printshop-etl\n\n  \
                  # Process a real export\n  \
                  printshop-etl -i data/raw/jobs.csv\n\n  \
                  # Reproducible sample with missing values, as JSON summary\n  \
                  printshop-etl --seed 7 --rows 500 --missing-rate 0.1 --json"
)]
struct Args {
    /// Path to the CSV file of job records
    ///
    /// If not specified, synthetic sample data is generated
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path of the processed CSV file
    ///
    /// Defaults to <data-dir>/processed/<output_file>
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file holding a serialized configuration
    ///
    /// Other flags override the values it contains
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root data directory (holds raw/ and processed/)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Seed for synthetic sample data
    #[arg(long)]
    seed: Option<u64>,

    /// Number of synthetic rows to generate
    #[arg(long)]
    rows: Option<usize>,

    /// Fraction of synthetic cells to leave empty (0.0 - 1.0)
    #[arg(long)]
    missing_rate: Option<f64>,

    /// Value substituted for missing categorical cells
    #[arg(long)]
    sentinel: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the summary)
    #[arg(short, long)]
    quiet: bool,

    /// Output the run summary as JSON on stdout instead of human-readable text
    ///
    /// Disables all progress logs.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Merge the optional config file with command line overrides.
fn build_config(args: &Args) -> Result<EtlConfig> {
    let base = match &args.config {
        Some(path) => EtlConfig::from_json_file(path)?,
        None => EtlConfig::default(),
    };

    let mut builder = EtlConfigBuilder::from_config(base);
    if let Some(ref dir) = args.data_dir {
        builder = builder.data_dir(dir);
    }
    if let Some(ref input) = args.input {
        builder = builder.input_file(input);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if let Some(rows) = args.rows {
        builder = builder.sample_rows(rows);
    }
    if let Some(rate) = args.missing_rate {
        builder = builder.missing_rate(rate);
    }
    if let Some(ref sentinel) = args.sentinel {
        builder = builder.missing_category(sentinel);
    }

    Ok(builder.build()?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    // Load environment variables from .env file
    dotenv().ok();

    let config = build_config(&args)?;
    let pipeline = Pipeline::builder().config(config).build()?;

    info!("{}", "=".repeat(80));
    info!("Starting print-shop jobs ETL pipeline...");
    info!("{}", "=".repeat(80));

    let result = match &args.output {
        Some(destination) => pipeline.run(pipeline.config().input_file.as_deref(), destination),
        None => pipeline.run_configured(),
    };

    match result {
        Ok(output) => handle_pipeline_output(&output, &args),
        Err(e) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&e)?);
            }
            let stage = e
                .stage()
                .map(|s| s.display_name())
                .unwrap_or("Configuration");
            error!("Pipeline failed during {}: {}", stage, e);
            Err(anyhow!("Pipeline failed during {}: {}", stage, e))
        }
    }
}

/// Print the run summary as JSON or as text.
fn handle_pipeline_output(output: &PipelineOutput, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&output.summary)?);
        return Ok(());
    }

    print_human_readable_summary(&output.summary, args);
    Ok(())
}

/// Print a human-readable summary of the run.
fn print_human_readable_summary(summary: &RunSummary, args: &Args) {
    println!();
    println!("{}", "=".repeat(80));
    println!("ETL PIPELINE COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    match &args.input {
        Some(input) => println!("Input:  {}", input.display()),
        None => println!("Input:  synthetic sample data"),
    }
    println!(
        "Output: {} ({} rows x {} columns)",
        summary.output_path.display(),
        summary.rows,
        summary.columns.len()
    );
    println!();

    println!("Dataset Summary:");
    println!("  Duration: {}ms", summary.duration_ms);
    if let (Some(start), Some(end)) = (&summary.period_start, &summary.period_end) {
        println!("  Period: {} to {}", start, end);
    }
    println!("  Departments: {}", summary.departments);
    println!("  Job types: {}", summary.job_types.join(", "));
    println!();

    println!("Columns:");
    for column in &summary.columns {
        println!("  - {}", column);
    }
    println!();

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}
