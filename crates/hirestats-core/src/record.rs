// Record loader
//
// Reads headerless delimited rows against the fixed Arrow schemas and decodes
// each RecordBatch into typed records. Any row that cannot be coerced fails
// the whole load.

use arrow::array::{Array, AsArray, Int32Array, RecordBatch, StringArray};
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{Int32Type, SchemaRef};
use std::io::Read;
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::schema::{self, field};

/// Reader settings shared by all three extracts
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub batch_size: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            batch_size: 8192,
        }
    }
}

/// A row type with a fixed positional schema
pub trait TableRecord: Sized {
    /// Table name used in diagnostics
    const TABLE: &'static str;

    fn schema() -> SchemaRef;

    /// Decode one batch. `first_line` is the 1-based input line of the
    /// batch's first row, used to locate rejected rows.
    fn from_batch(batch: &RecordBatch, first_line: usize) -> Result<Vec<Self>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub id: i32,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: i32,
    pub title: Option<String>,
}

/// A hire as read from the extract; `hired_at` is still raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiredEmployee {
    pub id: i32,
    pub name: Option<String>,
    pub hired_at: Option<String>,
    pub department_id: Option<i32>,
    pub job_id: Option<i32>,
}

/// Load every row of `reader` as `T`.
pub fn load_table<T, R>(reader: R, options: &LoadOptions) -> Result<Vec<T>>
where
    T: TableRecord,
    R: Read,
{
    let csv = ReaderBuilder::new(T::schema())
        .with_header(false)
        .with_delimiter(options.delimiter)
        .with_batch_size(options.batch_size)
        .build(reader)
        .map_err(|e| CoreError::schema(T::TABLE, e.to_string()))?;

    let mut records = Vec::new();
    for batch in csv {
        let batch = batch.map_err(|e| CoreError::schema(T::TABLE, e.to_string()))?;
        // one record per line, no header
        let first_line = records.len() + 1;
        records.extend(T::from_batch(&batch, first_line)?);
    }

    debug!(table = T::TABLE, rows = records.len(), "Loaded table");
    Ok(records)
}

impl TableRecord for Department {
    const TABLE: &'static str = "departments";

    fn schema() -> SchemaRef {
        schema::departments_schema()
    }

    fn from_batch(batch: &RecordBatch, first_line: usize) -> Result<Vec<Self>> {
        let ids = int32_column(batch, 0, Self::TABLE)?;
        let names = utf8_column(batch, 1, Self::TABLE)?;

        (0..batch.num_rows())
            .map(|row| {
                Ok(Department {
                    id: required(ids, row, first_line, Self::TABLE, field::ID)?,
                    name: optional_string(names, row),
                })
            })
            .collect()
    }
}

impl TableRecord for Job {
    const TABLE: &'static str = "jobs";

    fn schema() -> SchemaRef {
        schema::jobs_schema()
    }

    fn from_batch(batch: &RecordBatch, first_line: usize) -> Result<Vec<Self>> {
        let ids = int32_column(batch, 0, Self::TABLE)?;
        let titles = utf8_column(batch, 1, Self::TABLE)?;

        (0..batch.num_rows())
            .map(|row| {
                Ok(Job {
                    id: required(ids, row, first_line, Self::TABLE, field::ID)?,
                    title: optional_string(titles, row),
                })
            })
            .collect()
    }
}

impl TableRecord for HiredEmployee {
    const TABLE: &'static str = "hired_employees";

    fn schema() -> SchemaRef {
        schema::hired_employees_schema()
    }

    fn from_batch(batch: &RecordBatch, first_line: usize) -> Result<Vec<Self>> {
        let ids = int32_column(batch, 0, Self::TABLE)?;
        let names = utf8_column(batch, 1, Self::TABLE)?;
        let datetimes = utf8_column(batch, 2, Self::TABLE)?;
        let department_ids = int32_column(batch, 3, Self::TABLE)?;
        let job_ids = int32_column(batch, 4, Self::TABLE)?;

        (0..batch.num_rows())
            .map(|row| {
                Ok(HiredEmployee {
                    id: required(ids, row, first_line, Self::TABLE, field::ID)?,
                    name: optional_string(names, row),
                    hired_at: optional_string(datetimes, row),
                    department_id: optional_i32(department_ids, row),
                    job_id: optional_i32(job_ids, row),
                })
            })
            .collect()
    }
}

fn int32_column<'a>(
    batch: &'a RecordBatch,
    index: usize,
    table: &'static str,
) -> Result<&'a Int32Array> {
    column(batch, index, table)?
        .as_primitive_opt::<Int32Type>()
        .ok_or_else(|| CoreError::schema(table, format!("column {index} is not Int32")))
}

fn utf8_column<'a>(
    batch: &'a RecordBatch,
    index: usize,
    table: &'static str,
) -> Result<&'a StringArray> {
    column(batch, index, table)?
        .as_string_opt::<i32>()
        .ok_or_else(|| CoreError::schema(table, format!("column {index} is not Utf8")))
}

fn column<'a>(
    batch: &'a RecordBatch,
    index: usize,
    table: &'static str,
) -> Result<&'a dyn Array> {
    if index >= batch.num_columns() {
        return Err(CoreError::schema(
            table,
            format!(
                "expected at least {} columns, got {}",
                index + 1,
                batch.num_columns()
            ),
        ));
    }
    Ok(batch.column(index).as_ref())
}

fn required(
    column: &Int32Array,
    row: usize,
    first_line: usize,
    table: &'static str,
    name: &str,
) -> Result<i32> {
    if column.is_null(row) {
        return Err(CoreError::schema(
            table,
            format!(
                "missing value in required column '{name}' at line {}",
                first_line + row
            ),
        ));
    }
    Ok(column.value(row))
}

fn optional_i32(column: &Int32Array, row: usize) -> Option<i32> {
    column.is_valid(row).then(|| column.value(row))
}

fn optional_string(column: &StringArray, row: usize) -> Option<String> {
    column.is_valid(row).then(|| column.value(row).to_string())
}
