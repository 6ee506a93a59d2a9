use super::{LogFormat, MissingTimestampPolicy, RuntimeConfig};
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_PREFIX: &str = "HIRESTATS_";

/// Abstraction over environment-variable lookups so tests can supply their
/// own source of overrides instead of mutating the process environment.
pub trait EnvSource {
    /// Look up `key` with the HIRESTATS_ prefix applied
    fn get(&self, key: &str) -> Option<String>;
}

impl EnvSource for std::collections::HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        std::collections::HashMap::get(self, &format!("{}{}", ENV_PREFIX, key)).cloned()
    }
}

/// Apply environment-variable overrides to the runtime config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Run parameters
    if let Some(year) = get_env_parsed::<i32, _>(env, "TARGET_YEAR")? {
        config.run.target_year = year;
    }

    // Inputs
    if let Some(path) = get_env_string(env, "DEPARTMENTS_PATH") {
        config.input.departments = PathBuf::from(path);
    }
    if let Some(path) = get_env_string(env, "JOBS_PATH") {
        config.input.jobs = PathBuf::from(path);
    }
    if let Some(path) = get_env_string(env, "HIRED_EMPLOYEES_PATH") {
        config.input.hired_employees = PathBuf::from(path);
    }
    if let Some(delimiter) = get_env_parsed::<char, _>(env, "DELIMITER")? {
        config.input.delimiter = delimiter;
    }
    if let Some(batch_size) = get_env_parsed::<usize, _>(env, "BATCH_SIZE")? {
        config.input.batch_size = batch_size;
    }

    // Outputs
    if let Some(dir) = get_env_string(env, "OUTPUT_DIR") {
        config.output.dir = PathBuf::from(dir);
    }
    if let Some(name) = get_env_string(env, "QUARTERLY_FILE") {
        config.output.quarterly = name;
    }
    if let Some(name) = get_env_string(env, "ABOVE_AVERAGE_FILE") {
        config.output.above_average = name;
    }
    if let Some(overwrite) = get_env_parsed::<bool, _>(env, "OVERWRITE")? {
        config.output.overwrite = overwrite;
    }

    // Timestamp handling
    if let Some(format) = get_env_string(env, "TIMESTAMP_FORMAT") {
        config.temporal.format = format;
    }
    if let Some(policy) = get_env_string(env, "MISSING_TIMESTAMP") {
        config.temporal.missing = policy
            .parse::<MissingTimestampPolicy>()
            .context("Invalid HIRESTATS_MISSING_TIMESTAMP value")?;
    }

    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.logging.format = match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
    }

    Ok(())
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key)
}

fn get_env_parsed<T, E>(env: &E, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    E: EnvSource,
{
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val
                .parse::<T>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}
