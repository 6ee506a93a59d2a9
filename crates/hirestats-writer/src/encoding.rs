use arrow::array::RecordBatch;
use arrow::csv::WriterBuilder;
use arrow::error::ArrowError;
use std::io::Write;

/// Delimiter used when none is configured
pub const DEFAULT_DELIMITER: u8 = b',';

/// Encode a batch as delimited text with a header line.
///
/// The header is written even for an empty batch, so an empty report is
/// still a well-formed table. Nulls become empty fields. Returns the inner
/// writer so callers can flush or sync it.
pub fn encode_csv<W: Write>(batch: &RecordBatch, delimiter: u8, writer: W) -> Result<W, ArrowError> {
    let mut csv = WriterBuilder::new()
        .with_header(true)
        .with_delimiter(delimiter)
        .build(writer);
    csv.write(batch)?;
    Ok(csv.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hirestats_core::{QuarterlyReport, QuarterlyRow};

    fn report() -> QuarterlyReport {
        QuarterlyReport {
            rows: vec![
                QuarterlyRow {
                    department: None,
                    job: Some("Dev".to_string()),
                    quarters: [0, 2, 0, 0],
                },
                QuarterlyRow {
                    department: Some("Engineering".to_string()),
                    job: Some("Dev".to_string()),
                    quarters: [1, 1, 0, 0],
                },
            ],
        }
    }

    #[test]
    fn test_header_and_null_fields() {
        let batch = report().to_record_batch().unwrap();
        let bytes = encode_csv(&batch, DEFAULT_DELIMITER, Vec::new()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "department,job,1,2,3,4\n,Dev,0,2,0,0\nEngineering,Dev,1,1,0,0\n"
        );
    }

    #[test]
    fn test_empty_report_is_header_only() {
        let batch = QuarterlyReport::default().to_record_batch().unwrap();
        let bytes = encode_csv(&batch, b'|', Vec::new()).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "department|job|1|2|3|4\n");
    }
}
