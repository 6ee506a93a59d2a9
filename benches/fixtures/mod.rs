// Synthetic hiring extracts for benchmarking
//
// Deterministic CSV text spread over 2019..=2022, 50 departments and
// 30 jobs. Every 97th hire references a department that does not exist.

use std::fmt::Write;

pub const DEPARTMENT_COUNT: usize = 50;
pub const JOB_COUNT: usize = 30;

/// Workload size presets
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)]
pub enum WorkloadSize {
    Small,  // 10k hires
    Medium, // 250k hires
    Large,  // 1M hires
}

impl WorkloadSize {
    pub fn record_count(&self) -> usize {
        match self {
            WorkloadSize::Small => 10_000,
            WorkloadSize::Medium => 250_000,
            WorkloadSize::Large => 1_000_000,
        }
    }
}

pub struct Extracts {
    pub departments: String,
    pub jobs: String,
    pub hired_employees: String,
}

pub fn generate_extracts(size: WorkloadSize) -> Extracts {
    let mut departments = String::new();
    for id in 1..=DEPARTMENT_COUNT {
        let _ = writeln!(departments, "{id},Department {id}");
    }

    let mut jobs = String::new();
    for id in 1..=JOB_COUNT {
        let _ = writeln!(jobs, "{id},Job {id}");
    }

    let mut hired_employees = String::new();
    for id in 0..size.record_count() {
        let year = 2019 + id % 4;
        let month = 1 + (id / 4) % 12;
        let day = 1 + id % 28;
        // skew hiring towards low department ids
        let department = if id % 97 == 0 {
            DEPARTMENT_COUNT * 2
        } else {
            1 + (id * id) % DEPARTMENT_COUNT / (1 + id % 3)
        };
        let job = 1 + (id * 7) % JOB_COUNT;
        let _ = writeln!(
            hired_employees,
            "{id},Employee {id},{year}-{month:02}-{day:02}T09:30:00Z,{department},{job}"
        );
    }

    Extracts {
        departments,
        jobs,
        hired_employees,
    }
}
