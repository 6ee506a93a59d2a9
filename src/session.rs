//! Scoped report run
//!
//! A [`ReportSession`] owns one run from start to finish. Starting it checks
//! the configuration and prepares the output directory; dropping it closes
//! the run and logs how long it took, whether the run succeeded or not.

use anyhow::{Context, Result};
use hirestats_config::RuntimeConfig;
use hirestats_core::{compute_reports, Inputs, Reports};
use hirestats_writer::{CsvDirSink, ReportSink, WriteSummary};
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::{info, info_span, Span};

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub reports: Reports,
    pub written: WriteSummary,
}

pub struct ReportSession {
    config: RuntimeConfig,
    span: Span,
    started: Instant,
}

impl ReportSession {
    pub fn start(config: RuntimeConfig) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        std::fs::create_dir_all(&config.output.dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                config.output.dir.display()
            )
        })?;

        let span = info_span!("report_run", target_year = config.run.target_year);
        span.in_scope(|| {
            info!(
                departments = %config.input.departments.display(),
                jobs = %config.input.jobs.display(),
                hired_employees = %config.input.hired_employees.display(),
                output_dir = %config.output.dir.display(),
                "Report session started"
            )
        });

        Ok(Self {
            config,
            span,
            started: Instant::now(),
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Load, compute and persist both reports.
    ///
    /// Outputs are only touched once both reports have been computed.
    pub fn run(&self) -> Result<RunSummary> {
        let _entered = self.span.enter();

        let inputs = self.load_inputs()?;
        let reports = compute_reports(&inputs, &self.config.pipeline_options())
            .context("Failed to compute reports")?;

        let written = self
            .sink()
            .write_reports(&reports)
            .context("Failed to write reports")?;

        Ok(RunSummary { reports, written })
    }

    fn load_inputs(&self) -> Result<Inputs> {
        let input = &self.config.input;
        Inputs::load(
            open_extract("departments", &input.departments)?,
            open_extract("jobs", &input.jobs)?,
            open_extract("hired_employees", &input.hired_employees)?,
            &self.config.load_options(),
        )
        .context("Failed to load input extracts")
    }

    fn sink(&self) -> CsvDirSink {
        let output = &self.config.output;
        CsvDirSink::new(output.quarterly_path(), output.above_average_path())
            .with_overwrite(output.overwrite)
    }
}

impl Drop for ReportSession {
    fn drop(&mut self) {
        let _entered = self.span.enter();
        info!(
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Report session finished"
        );
    }
}

fn open_extract(table: &str, path: &Path) -> Result<File> {
    File::open(path)
        .with_context(|| format!("Failed to open {} extract: {}", table, path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_rejects_invalid_config() {
        let mut config = RuntimeConfig::default();
        config.input.batch_size = 0;
        let err = ReportSession::start(config).err().unwrap();
        assert!(format!("{:#}", err).contains("batch_size"));
    }

    #[test]
    fn test_start_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RuntimeConfig::default();
        config.output.dir = dir.path().join("nested").join("reports");

        let session = ReportSession::start(config).unwrap();
        assert!(session.config().output.dir.is_dir());
    }

    #[test]
    fn test_missing_extract_names_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RuntimeConfig::default();
        config.input.departments = dir.path().join("absent.csv");
        config.output.dir = dir.path().to_path_buf();

        let session = ReportSession::start(config).unwrap();
        let err = session.run().unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open departments extract"));
    }
}
