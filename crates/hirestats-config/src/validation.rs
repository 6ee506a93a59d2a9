// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_run_config(&config.run)?;
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    validate_temporal_config(&config.temporal)?;

    Ok(())
}

fn validate_run_config(config: &RunConfig) -> Result<()> {
    if !(1..=9999).contains(&config.target_year) {
        bail!(
            "run.target_year must be between 1 and 9999, got {}",
            config.target_year
        );
    }

    Ok(())
}

fn validate_input_config(config: &InputConfig) -> Result<()> {
    for (key, path) in [
        ("input.departments", &config.departments),
        ("input.jobs", &config.jobs),
        ("input.hired_employees", &config.hired_employees),
    ] {
        if path.as_os_str().is_empty() {
            bail!("{} must not be empty", key);
        }
    }

    if !config.delimiter.is_ascii() || matches!(config.delimiter, '\n' | '\r' | '"') {
        bail!(
            "input.delimiter must be a single ASCII character other than a quote or line break, got {:?}",
            config.delimiter
        );
    }

    if config.batch_size == 0 {
        bail!("input.batch_size must be greater than 0");
    }

    if config.batch_size > 1_000_000 {
        warn!(
            batch_size = config.batch_size,
            "input.batch_size is very large; may cause memory issues"
        );
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<()> {
    if config.quarterly.is_empty() {
        bail!("output.quarterly must not be empty");
    }

    if config.above_average.is_empty() {
        bail!("output.above_average must not be empty");
    }

    if config.quarterly == config.above_average {
        bail!(
            "output.quarterly and output.above_average must name different files, both are '{}'",
            config.quarterly
        );
    }

    for (key, name) in [
        ("output.quarterly", &config.quarterly),
        ("output.above_average", &config.above_average),
    ] {
        if name.contains(['/', '\\']) {
            bail!("{} must be a file name inside output.dir, got '{}'", key, name);
        }
    }

    Ok(())
}

fn validate_temporal_config(config: &TemporalConfig) -> Result<()> {
    if config.format.trim().is_empty() {
        bail!("temporal.format must not be empty");
    }

    Ok(())
}
