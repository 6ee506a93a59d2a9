// hirestats-config - Run configuration
//
// Supports configuration from multiple sources:
// 1. CLI flags (highest priority, applied by the binary)
// 2. Environment variables (HIRESTATS_* prefix)
// 3. Config file path from HIRESTATS_CONFIG, or inline HIRESTATS_CONFIG_CONTENT
// 4. Default config file locations (./hirestats.toml, ./.hirestats.toml)
// 5. Built-in defaults (lowest priority)

use anyhow::Result;
use hirestats_core::temporal::DEFAULT_TIMESTAMP_FORMAT;
use hirestats_core::{
    LoadOptions, MissingTimestamp, PipelineOptions, TemporalOptions, DEFAULT_TARGET_YEAR,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{apply_env_overrides, EnvSource, ENV_PREFIX};

/// Main run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub temporal: TemporalConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Only hires from this year reach the reports
    pub target_year: i32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_year: DEFAULT_TARGET_YEAR,
        }
    }
}

/// Input extracts: headerless delimited files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub departments: PathBuf,
    pub jobs: PathBuf,
    pub hired_employees: PathBuf,
    pub delimiter: char,
    /// Rows decoded per Arrow batch
    pub batch_size: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            departments: PathBuf::from("departments.csv"),
            jobs: PathBuf::from("jobs.csv"),
            hired_employees: PathBuf::from("hired_employees.csv"),
            delimiter: ',',
            batch_size: 8192,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub quarterly: String,
    pub above_average: String,
    /// Replace existing report files; when false an existing file is an error
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            quarterly: "hired_by_quarter.csv".to_string(),
            above_average: "departments_above_mean.csv".to_string(),
            overwrite: true,
        }
    }
}

impl OutputConfig {
    pub fn quarterly_path(&self) -> PathBuf {
        self.dir.join(&self.quarterly)
    }

    pub fn above_average_path(&self) -> PathBuf {
        self.dir.join(&self.above_average)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// chrono format string for the hire timestamp
    pub format: String,
    pub missing: MissingTimestampPolicy,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            missing: MissingTimestampPolicy::Fail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTimestampPolicy {
    #[default]
    Fail,
    Exclude,
}

impl std::str::FromStr for MissingTimestampPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fail" | "error" => Ok(Self::Fail),
            "exclude" | "skip" => Ok(Self::Exclude),
            _ => anyhow::bail!(
                "Unsupported missing timestamp policy: {}. Supported: fail, exclude",
                s
            ),
        }
    }
}

impl From<MissingTimestampPolicy> for MissingTimestamp {
    fn from(policy: MissingTimestampPolicy) -> Self {
        match policy {
            MissingTimestampPolicy::Fail => MissingTimestamp::Fail,
            MissingTimestampPolicy::Exclude => MissingTimestamp::Exclude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl RuntimeConfig {
    /// Load configuration from the default file locations and environment
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Load configuration from an explicit file, then apply environment overrides
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Parse TOML content on top of the defaults, without environment overrides
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides from a custom source
    pub fn apply_env_overrides_from<E: EnvSource>(&mut self, env: &E) -> Result<()> {
        env_overrides::apply_env_overrides(self, env)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Reader settings for the record loader
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            // validation guarantees a single-byte delimiter
            delimiter: u8::try_from(self.input.delimiter).unwrap_or(b','),
            batch_size: self.input.batch_size,
        }
    }

    /// Run parameters for the transformation
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            target_year: self.run.target_year,
            temporal: TemporalOptions {
                format: self.temporal.format.clone(),
                missing: self.temporal.missing.into(),
            },
        }
    }
}
