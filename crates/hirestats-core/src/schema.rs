// Arrow schemas for the three input extracts and the two reports
//
// Input files carry no header, so column order is the contract. Input `id`
// columns are read as nullable; the record decoder rejects a missing id and
// names its line. Output schemas name the quarter columns "1".."4" to match
// the published layout.

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use std::sync::{Arc, OnceLock};

pub mod field {
    pub const ID: &str = "id";
    pub const DEPARTMENT: &str = "department";
    pub const JOB: &str = "job";
    pub const NAME: &str = "name";
    pub const DATETIME: &str = "datetime";
    pub const DEPARTMENT_ID: &str = "department_id";
    pub const JOB_ID: &str = "job_id";
    pub const HIRED: &str = "hired";
    pub const QUARTERS: [&str; 4] = ["1", "2", "3", "4"];
}

/// `(id, department)`
pub fn departments_schema() -> SchemaRef {
    static SCHEMA: OnceLock<SchemaRef> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        Arc::new(Schema::new(vec![
            Field::new(field::ID, DataType::Int32, true),
            Field::new(field::DEPARTMENT, DataType::Utf8, true),
        ]))
    }))
}

/// `(id, job)`
pub fn jobs_schema() -> SchemaRef {
    static SCHEMA: OnceLock<SchemaRef> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        Arc::new(Schema::new(vec![
            Field::new(field::ID, DataType::Int32, true),
            Field::new(field::JOB, DataType::Utf8, true),
        ]))
    }))
}

/// `(id, name, datetime, department_id, job_id)`
///
/// `datetime` is read as text; the temporal normalizer owns its parsing.
pub fn hired_employees_schema() -> SchemaRef {
    static SCHEMA: OnceLock<SchemaRef> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        Arc::new(Schema::new(vec![
            Field::new(field::ID, DataType::Int32, true),
            Field::new(field::NAME, DataType::Utf8, true),
            Field::new(field::DATETIME, DataType::Utf8, true),
            Field::new(field::DEPARTMENT_ID, DataType::Int32, true),
            Field::new(field::JOB_ID, DataType::Int32, true),
        ]))
    }))
}

/// `(department, job, 1, 2, 3, 4)`; quarter cells are never null.
pub fn quarterly_report_schema() -> SchemaRef {
    static SCHEMA: OnceLock<SchemaRef> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        let mut fields = vec![
            Field::new(field::DEPARTMENT, DataType::Utf8, true),
            Field::new(field::JOB, DataType::Utf8, true),
        ];
        fields.extend(
            field::QUARTERS
                .iter()
                .map(|q| Field::new(*q, DataType::Int64, false)),
        );
        Arc::new(Schema::new(fields))
    }))
}

/// `(id, department, hired)`
pub fn above_average_schema() -> SchemaRef {
    static SCHEMA: OnceLock<SchemaRef> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        Arc::new(Schema::new(vec![
            Field::new(field::ID, DataType::Int32, true),
            Field::new(field::DEPARTMENT, DataType::Utf8, true),
            Field::new(field::HIRED, DataType::Int64, false),
        ]))
    }))
}
