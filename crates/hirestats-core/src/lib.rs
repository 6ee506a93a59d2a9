// hirestats-core - Pure hiring report logic
//
// Raw rows -> typed records -> year-filtered hires -> joined hires -> two
// independent aggregations. Readers are supplied by the caller; this crate
// never opens files or writes output.

use std::io::Read;
use tracing::info;

pub mod aggregate;
pub mod error;
pub mod join;
pub mod record;
pub mod schema;
pub mod temporal;

pub use aggregate::{AboveAverageReport, AboveAverageRow, QuarterlyReport, QuarterlyRow};
pub use error::{CoreError, Result};
pub use join::{DimensionIndex, EnrichedHire};
pub use record::{load_table, Department, HiredEmployee, Job, LoadOptions, TableRecord};
pub use temporal::{MissingTimestamp, NormalizedHire, Quarter, TemporalOptions};

/// Year used by the reference reports
pub const DEFAULT_TARGET_YEAR: i32 = 2021;

/// Run parameters consumed by the transformation
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub target_year: i32,
    pub temporal: TemporalOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            target_year: DEFAULT_TARGET_YEAR,
            temporal: TemporalOptions::default(),
        }
    }
}

/// The three loaded extracts
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub departments: Vec<Department>,
    pub jobs: Vec<Job>,
    pub hired_employees: Vec<HiredEmployee>,
}

impl Inputs {
    /// Load all three extracts, failing on the first schema violation.
    pub fn load<D, J, H>(
        departments: D,
        jobs: J,
        hired_employees: H,
        options: &LoadOptions,
    ) -> Result<Self>
    where
        D: Read,
        J: Read,
        H: Read,
    {
        let inputs = Self {
            departments: load_table(departments, options)?,
            jobs: load_table(jobs, options)?,
            hired_employees: load_table(hired_employees, options)?,
        };

        info!(
            departments = inputs.departments.len(),
            jobs = inputs.jobs.len(),
            hired_employees = inputs.hired_employees.len(),
            "Loaded input tables"
        );
        Ok(inputs)
    }
}

/// Both reports for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reports {
    pub target_year: i32,
    /// Hires that survived the year filter
    pub hires_in_year: usize,
    pub quarterly: QuarterlyReport,
    pub above_average: AboveAverageReport,
}

/// Compute both reports from loaded inputs.
///
/// Deterministic for the same inputs: grouping uses ordered keys and both
/// outputs carry a total ordering.
pub fn compute_reports(inputs: &Inputs, options: &PipelineOptions) -> Result<Reports> {
    let normalized = temporal::normalize_all(&inputs.hired_employees, &options.temporal)?;
    let hires = temporal::filter_year(normalized, options.target_year);

    if hires.is_empty() {
        info!(
            target_year = options.target_year,
            "No hires in target year; both reports will be empty"
        );
    }

    let departments = DimensionIndex::departments(&inputs.departments);
    let jobs = DimensionIndex::jobs(&inputs.jobs);

    let enriched = join::enrich(&hires, &departments, &jobs);
    let quarterly = aggregate::quarterly_report(&enriched);
    let above_average = aggregate::above_average_report(&hires, &departments);

    info!(
        target_year = options.target_year,
        hires = hires.len(),
        quarterly_rows = quarterly.len(),
        above_average_rows = above_average.len(),
        mean = above_average.mean,
        "Computed reports"
    );

    Ok(Reports {
        target_year: options.target_year,
        hires_in_year: hires.len(),
        quarterly,
        above_average,
    })
}
