// Configuration source loading
//
// Priority order:
// 1. Environment variables (HIRESTATS_* prefix)
// 2. Config file path from HIRESTATS_CONFIG
// 3. Inline config content from HIRESTATS_CONFIG_CONTENT
// 4. Default config files (./hirestats.toml, ./.hirestats.toml)
// 5. Built-in defaults
//
// Sections and keys missing from a file keep their defaults.

use crate::env_overrides::{self, EnvSource, ENV_PREFIX};
use crate::RuntimeConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;
use tracing::debug;

const DEFAULT_CONFIG_FILES: [&str; 2] = ["./hirestats.toml", "./.hirestats.toml"];

/// Load configuration from the environment and the default file locations.
pub fn load_config() -> Result<RuntimeConfig> {
    let mut config = load_from_file()?.unwrap_or_default();

    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

fn load_from_file() -> Result<Option<RuntimeConfig>> {
    if let Ok(path) = env::var("HIRESTATS_CONFIG") {
        return read_config_file(Path::new(&path)).map(Some);
    }

    if let Ok(content) = env::var("HIRESTATS_CONFIG_CONTENT") {
        let config = RuntimeConfig::from_toml(&content)
            .context("Failed to parse inline config from HIRESTATS_CONFIG_CONTENT")?;
        debug!("Loaded inline configuration");
        return Ok(Some(config));
    }

    for path in DEFAULT_CONFIG_FILES {
        let path = Path::new(path);
        if path.exists() {
            return read_config_file(path).map(Some);
        }
    }

    Ok(None)
}

/// Load configuration from a specific file path (for the CLI --config flag).
/// Returns an error if the file doesn't exist or can't be parsed.
pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<RuntimeConfig> {
    let mut config = read_config_file(path.as_ref())?;

    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<RuntimeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = RuntimeConfig::from_toml(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    debug!(path = %path.display(), "Loaded configuration file");
    Ok(config)
}

struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_load_from_file_path_reads_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[input]
departments = "/data/departments.csv"

[output]
dir = "/data/out"
overwrite = false
"#
        )
        .unwrap();

        let config = read_config_file(file.path()).unwrap();
        assert_eq!(config.input.departments, PathBuf::from("/data/departments.csv"));
        assert_eq!(config.input.jobs, PathBuf::from("jobs.csv"));
        assert_eq!(config.output.dir, PathBuf::from("/data/out"));
        assert!(!config.output.overwrite);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_file_path(dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[run]\ntarget_year = \"soon\"").unwrap();

        let err = read_config_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
