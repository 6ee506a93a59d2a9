use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use clap::Parser;
use hirestats::{init_tracing, ReportSession, Reports, RuntimeConfig};
use std::path::PathBuf;
use tracing::info;

/// Quarterly and above-average hiring reports from CSV extracts
#[derive(Parser)]
#[command(name = "hirestats")]
#[command(version)]
#[command(about = "Quarterly and above-average hiring reports from CSV extracts", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Year whose hires are reported (overrides config file)
    #[arg(short, long, value_name = "YEAR")]
    year: Option<i32>,

    /// Departments extract (id,department)
    #[arg(long, value_name = "FILE")]
    departments: Option<PathBuf>,

    /// Jobs extract (id,job)
    #[arg(long, value_name = "FILE")]
    jobs: Option<PathBuf>,

    /// Hired employees extract (id,name,datetime,department_id,job_id)
    #[arg(long, value_name = "FILE")]
    hired_employees: Option<PathBuf>,

    /// Directory the two reports are written to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Print both reports to stdout after writing them
    #[arg(long)]
    show: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Step 1: Load base configuration
    let mut config = if let Some(config_path) = &cli.config {
        RuntimeConfig::load_from_path(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        RuntimeConfig::load().context("Failed to load configuration")?
    };

    // Step 2: Apply CLI overrides (highest priority)
    apply_cli_overrides(&mut config, &cli);

    // Step 3: Initialize tracing before the run so session events show up
    init_tracing(&config.logging);

    // Step 4: Run
    let summary = ReportSession::start(config)?.run()?;

    info!(
        quarterly = %summary.written.quarterly.path.display(),
        above_average = %summary.written.above_average.path.display(),
        "Reports written"
    );

    if cli.show {
        print_reports(&summary.reports)?;
    }

    Ok(())
}

fn apply_cli_overrides(config: &mut RuntimeConfig, cli: &Cli) {
    if let Some(year) = cli.year {
        config.run.target_year = year;
    }
    if let Some(path) = &cli.departments {
        config.input.departments = path.clone();
    }
    if let Some(path) = &cli.jobs {
        config.input.jobs = path.clone();
    }
    if let Some(path) = &cli.hired_employees {
        config.input.hired_employees = path.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
}

fn print_reports(reports: &Reports) -> Result<()> {
    let quarterly = reports.quarterly.to_record_batch()?;
    let above_average = reports.above_average.to_record_batch()?;

    println!("Hires by quarter in {}", reports.target_year);
    println!("{}", pretty_format_batches(&[quarterly])?);

    match reports.above_average.mean {
        Some(mean) => println!("Departments above the mean of {:.2} hires", mean),
        None => println!("No departments hired in {}", reports.target_year),
    }
    println!("{}", pretty_format_batches(&[above_average])?);

    Ok(())
}
