// Report aggregations over year-filtered hires
//
// Both branches read the same filtered input and never feed each other.

pub mod above_average;
pub mod quarterly;

pub use above_average::{
    above_average_report, count_by_department, mean_hired, AboveAverageReport, AboveAverageRow,
    DepartmentCounts,
};
pub use quarterly::{
    count_by_quarter, pivot_quarters, quarterly_report, QuarterlyReport, QuarterlyRow,
};
