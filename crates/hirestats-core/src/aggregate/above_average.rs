// Above-average aggregator
//
// Counts year-filtered hires per department_id, averages those counts over
// the departments that hired at least once, and keeps departments strictly
// above that mean. The mean is taken before filtering. Hires with a null
// department_id form their own group, the same way a relational GROUP BY
// treats a null key.

use arrow::array::{ArrayRef, Int32Builder, Int64Builder, RecordBatch, StringBuilder};
use arrow::error::ArrowError;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::join::DimensionIndex;
use crate::schema::above_average_schema;
use crate::temporal::NormalizedHire;

/// Hires per department_id, in id order (null first)
pub type DepartmentCounts = BTreeMap<Option<i32>, i64>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AboveAverageRow {
    pub department_id: Option<i32>,
    pub department: Option<String>,
    pub hired: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AboveAverageReport {
    /// Mean hires per department; `None` when no department hired
    pub mean: Option<f64>,
    /// Every department's count, including the ones filtered out
    pub department_counts: DepartmentCounts,
    /// Ordered by `hired` desc, then department name asc, then id asc
    /// (nulls last for both tie-breakers)
    pub rows: Vec<AboveAverageRow>,
}

impl AboveAverageReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let mut id = Int32Builder::with_capacity(self.rows.len());
        let mut department = StringBuilder::with_capacity(self.rows.len(), 0);
        let mut hired = Int64Builder::with_capacity(self.rows.len());

        for row in &self.rows {
            id.append_option(row.department_id);
            department.append_option(row.department.as_deref());
            hired.append_value(row.hired);
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(id.finish()),
            Arc::new(department.finish()),
            Arc::new(hired.finish()),
        ];
        RecordBatch::try_new(above_average_schema(), columns)
    }
}

/// Group and count hires by department_id.
pub fn count_by_department(hires: &[NormalizedHire]) -> DepartmentCounts {
    let mut counts = DepartmentCounts::new();
    for hire in hires {
        *counts.entry(hire.department_id).or_insert(0) += 1;
    }
    counts
}

/// Arithmetic mean of the per-department counts.
///
/// Only departments present in `counts` contribute; a department with no
/// hires is absent rather than a zero. Returns `None` for an empty grouping.
pub fn mean_hired(counts: &DepartmentCounts) -> Option<f64> {
    if counts.is_empty() {
        return None;
    }
    let total: i64 = counts.values().sum();
    Some(total as f64 / counts.len() as f64)
}

/// Build the above-average report from year-filtered hires.
pub fn above_average_report(
    hires: &[NormalizedHire],
    departments: &DimensionIndex,
) -> AboveAverageReport {
    let department_counts = count_by_department(hires);
    let Some(mean) = mean_hired(&department_counts) else {
        info!("No hires in target year; above-average report is empty");
        return AboveAverageReport::default();
    };

    let mut rows: Vec<AboveAverageRow> = department_counts
        .iter()
        .filter(|(_, &hired)| hired as f64 > mean)
        .flat_map(|(&department_id, &hired)| {
            departments
                .lookup(department_id)
                .iter()
                .map(move |name| AboveAverageRow {
                    department_id,
                    department: name.clone(),
                    hired,
                })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.hired
            .cmp(&a.hired)
            .then_with(|| nulls_last(&a.department, &b.department))
            .then_with(|| nulls_last(&a.department_id, &b.department_id))
    });

    debug!(
        departments = department_counts.len(),
        mean,
        above = rows.len(),
        "Computed above-average departments"
    );

    AboveAverageReport {
        mean: Some(mean),
        department_counts,
        rows,
    }
}

fn nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
