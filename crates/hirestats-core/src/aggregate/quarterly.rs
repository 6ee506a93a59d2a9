// Quarterly aggregator
//
// Counts hires per (department, job, quarter), then reshapes the quarter
// dimension into four columns. The reshape enumerates every observed
// (department, job) pair first and fills each quarter from the counts,
// defaulting to zero, so no quarter cell can ever be missing.

use arrow::array::{ArrayRef, Int64Builder, RecordBatch, StringBuilder};
use arrow::error::ArrowError;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

use crate::join::EnrichedHire;
use crate::schema::quarterly_report_schema;
use crate::temporal::Quarter;

/// `(department, job)` grouping key; `None` is an unmatched dimension.
pub type PairKey = (Option<String>, Option<String>);

/// Long-format counts, one entry per observed (pair, quarter)
pub type QuarterCounts = HashMap<(PairKey, Quarter), i64>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarterlyRow {
    pub department: Option<String>,
    pub job: Option<String>,
    /// Hires per quarter, index 0 is Q1
    pub quarters: [i64; 4],
}

impl QuarterlyRow {
    pub fn count(&self, quarter: Quarter) -> i64 {
        self.quarters[quarter.index()]
    }

    pub fn total(&self) -> i64 {
        self.quarters.iter().sum()
    }
}

/// One row per (department, job), sorted ascending with nulls first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuarterlyReport {
    pub rows: Vec<QuarterlyRow>,
}

impl QuarterlyReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the row for a pair, if it was observed
    pub fn row(&self, department: Option<&str>, job: Option<&str>) -> Option<&QuarterlyRow> {
        self.rows
            .iter()
            .find(|r| r.department.as_deref() == department && r.job.as_deref() == job)
    }

    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let mut department = StringBuilder::with_capacity(self.rows.len(), 0);
        let mut job = StringBuilder::with_capacity(self.rows.len(), 0);
        let mut quarters: [Int64Builder; 4] =
            std::array::from_fn(|_| Int64Builder::with_capacity(self.rows.len()));

        for row in &self.rows {
            department.append_option(row.department.as_deref());
            job.append_option(row.job.as_deref());
            for (builder, count) in quarters.iter_mut().zip(row.quarters) {
                builder.append_value(count);
            }
        }

        let mut columns: Vec<ArrayRef> =
            vec![Arc::new(department.finish()), Arc::new(job.finish())];
        columns.extend(
            quarters
                .iter_mut()
                .map(|builder| Arc::new(builder.finish()) as ArrayRef),
        );

        RecordBatch::try_new(quarterly_report_schema(), columns)
    }
}

/// Group and count hires by (department, job, quarter).
pub fn count_by_quarter(hires: &[EnrichedHire]) -> QuarterCounts {
    let mut counts = QuarterCounts::new();
    for hire in hires {
        let key = ((hire.department.clone(), hire.job.clone()), hire.quarter);
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Widen long-format counts into one row per pair with all four quarters.
pub fn pivot_quarters(counts: &QuarterCounts) -> Vec<QuarterlyRow> {
    let pairs: BTreeSet<&PairKey> = counts.keys().map(|(pair, _)| pair).collect();

    pairs
        .into_iter()
        .map(|pair| {
            let quarters = Quarter::ALL.map(|quarter| {
                counts
                    .get(&(pair.clone(), quarter))
                    .copied()
                    .unwrap_or(0)
            });
            QuarterlyRow {
                department: pair.0.clone(),
                job: pair.1.clone(),
                quarters,
            }
        })
        .collect()
}

/// Build the quarterly report from joined hires.
pub fn quarterly_report(hires: &[EnrichedHire]) -> QuarterlyReport {
    let counts = count_by_quarter(hires);
    let rows = pivot_quarters(&counts);
    debug!(groups = counts.len(), rows = rows.len(), "Pivoted quarterly counts");
    QuarterlyReport { rows }
}
