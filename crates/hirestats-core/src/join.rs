// Dimension joiner
//
// Left-outer joins year-filtered hires to the department and job dimensions.
// The two joins are independent lookups against their own index; a hire
// yields the product of its department matches and job matches, with a
// single null-named match standing in for "no row".

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::record::{Department, Job};
use crate::temporal::{NormalizedHire, Quarter};

/// A hire widened with dimension names. Names are `None` when unmatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedHire {
    pub id: i32,
    pub department_id: Option<i32>,
    pub job_id: Option<i32>,
    pub department: Option<String>,
    pub job: Option<String>,
    pub year: i32,
    pub quarter: Quarter,
}

/// `id -> names` lookup over one dimension table
#[derive(Debug, Default)]
pub struct DimensionIndex {
    names: HashMap<i32, Vec<Option<String>>>,
}

impl DimensionIndex {
    pub fn build<I>(table: &'static str, rows: I) -> Self
    where
        I: IntoIterator<Item = (i32, Option<String>)>,
    {
        let mut names: HashMap<i32, Vec<Option<String>>> = HashMap::new();
        for (id, name) in rows {
            names.entry(id).or_default().push(name);
        }

        let duplicated = names.values().filter(|v| v.len() > 1).count();
        if duplicated > 0 {
            warn!(table, duplicated, "Dimension table has duplicate ids");
        }

        Self { names }
    }

    pub fn departments(departments: &[Department]) -> Self {
        Self::build(
            "departments",
            departments.iter().map(|d| (d.id, d.name.clone())),
        )
    }

    pub fn jobs(jobs: &[Job]) -> Self {
        Self::build("jobs", jobs.iter().map(|j| (j.id, j.title.clone())))
    }

    /// Matching names for a foreign key. A null or dangling key yields a
    /// single `None`, which is exactly what a left join emits.
    pub fn lookup(&self, id: Option<i32>) -> &[Option<String>] {
        const UNMATCHED: &[Option<String>] = &[None];
        id.and_then(|id| self.names.get(&id))
            .map(Vec::as_slice)
            .unwrap_or(UNMATCHED)
    }

    /// First matching name, for single-valued lookups
    pub fn name_of(&self, id: Option<i32>) -> Option<&str> {
        self.lookup(id).first().and_then(|n| n.as_deref())
    }
}

/// Join hires to both dimensions. Every hire produces at least one row.
pub fn enrich(
    hires: &[NormalizedHire],
    departments: &DimensionIndex,
    jobs: &DimensionIndex,
) -> Vec<EnrichedHire> {
    let mut enriched = Vec::with_capacity(hires.len());
    let mut unmatched_departments = 0usize;
    let mut unmatched_jobs = 0usize;

    for hire in hires {
        let department_names = departments.lookup(hire.department_id);
        let job_names = jobs.lookup(hire.job_id);

        if matches!(department_names, [None]) {
            unmatched_departments += 1;
        }
        if matches!(job_names, [None]) {
            unmatched_jobs += 1;
        }

        for department in department_names {
            for job in job_names {
                enriched.push(EnrichedHire {
                    id: hire.id,
                    department_id: hire.department_id,
                    job_id: hire.job_id,
                    department: department.clone(),
                    job: job.clone(),
                    year: hire.year,
                    quarter: hire.quarter,
                });
            }
        }
    }

    debug!(
        hires = hires.len(),
        rows = enriched.len(),
        unmatched_departments,
        unmatched_jobs,
        "Joined hires to dimensions"
    );
    enriched
}
