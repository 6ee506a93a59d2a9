// Temporal normalizer
//
// Parses the raw hire timestamp, derives year and quarter, and narrows the
// hires to the target year. Parsing happens for every hire, not only the
// target year, so a malformed timestamp anywhere in the extract fails the run.

use chrono::{Datelike, NaiveDateTime};
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::{CoreError, Result};
use crate::record::HiredEmployee;

/// ISO-8601 local date-time with optional fractional seconds.
/// A trailing `Z` designator is accepted on top of this format.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Calendar quarter, always in `1..=4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter(u8);

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter(1), Quarter(2), Quarter(3), Quarter(4)];

    /// `floor((month - 1) / 3) + 1`; `None` outside `1..=12`.
    pub fn from_month(month: u32) -> Option<Self> {
        (1..=12)
            .contains(&month)
            .then(|| Quarter(((month - 1) / 3 + 1) as u8))
    }

    /// Quarter of a date-time; chrono months are always in range.
    fn of(at: &NaiveDateTime) -> Self {
        Quarter((at.month0() / 3 + 1) as u8)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based position, for indexing per-quarter arrays
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// What to do with a hire whose timestamp field is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingTimestamp {
    /// Raise `TemporalParseError`
    #[default]
    Fail,
    /// Drop the hire before year filtering and count it
    Exclude,
}

#[derive(Debug, Clone)]
pub struct TemporalOptions {
    pub format: String,
    pub missing: MissingTimestamp,
}

impl Default for TemporalOptions {
    fn default() -> Self {
        Self {
            format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            missing: MissingTimestamp::Fail,
        }
    }
}

/// A hire with a parsed timestamp and its derived calendar keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHire {
    pub id: i32,
    pub name: Option<String>,
    pub hired_at: NaiveDateTime,
    pub year: i32,
    pub quarter: Quarter,
    pub department_id: Option<i32>,
    pub job_id: Option<i32>,
}

/// Parse a hire timestamp under `format`, tolerating a trailing `Z`.
pub fn parse_hired_at(
    value: &str,
    format: &str,
) -> std::result::Result<NaiveDateTime, chrono::ParseError> {
    let value = value.trim();
    match value.strip_suffix('Z') {
        Some(naive) => NaiveDateTime::parse_from_str(naive, format)
            .or_else(|_| NaiveDateTime::parse_from_str(value, format)),
        None => NaiveDateTime::parse_from_str(value, format),
    }
}

/// Normalize one hire. `Ok(None)` means the hire was excluded by policy.
pub fn normalize(
    hire: &HiredEmployee,
    options: &TemporalOptions,
) -> Result<Option<NormalizedHire>> {
    let Some(raw) = hire.hired_at.as_deref() else {
        return match options.missing {
            MissingTimestamp::Fail => Err(CoreError::TemporalParseError {
                employee_id: hire.id,
                value: None,
                reason: "timestamp is missing".to_string(),
            }),
            MissingTimestamp::Exclude => Ok(None),
        };
    };

    let hired_at =
        parse_hired_at(raw, &options.format).map_err(|e| CoreError::TemporalParseError {
            employee_id: hire.id,
            value: Some(raw.to_string()),
            reason: format!("{e} (expected format '{}')", options.format),
        })?;

    Ok(Some(NormalizedHire {
        id: hire.id,
        name: hire.name.clone(),
        hired_at,
        year: hired_at.year(),
        quarter: Quarter::of(&hired_at),
        department_id: hire.department_id,
        job_id: hire.job_id,
    }))
}

/// Normalize every hire, failing on the first unparseable timestamp.
pub fn normalize_all(
    hires: &[HiredEmployee],
    options: &TemporalOptions,
) -> Result<Vec<NormalizedHire>> {
    let total = hires.len();
    let mut normalized = Vec::with_capacity(total);
    for hire in hires {
        if let Some(hire) = normalize(hire, options)? {
            normalized.push(hire);
        }
    }

    let excluded = total - normalized.len();
    if excluded > 0 {
        warn!(excluded, "Excluded hires with a missing timestamp");
    }
    debug!(normalized = normalized.len(), "Normalized hire timestamps");
    Ok(normalized)
}

/// Keep only hires from `year`. Other years are dropped, not errors.
pub fn filter_year(hires: Vec<NormalizedHire>, year: i32) -> Vec<NormalizedHire> {
    let total = hires.len();
    let kept: Vec<_> = hires.into_iter().filter(|h| h.year == year).collect();
    info!(
        target_year = year,
        kept = kept.len(),
        dropped = total - kept.len(),
        "Filtered hires to target year"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn hire(id: i32, hired_at: Option<&str>) -> HiredEmployee {
        HiredEmployee {
            id,
            name: Some(format!("employee-{id}")),
            hired_at: hired_at.map(str::to_string),
            department_id: Some(1),
            job_id: Some(1),
        }
    }

    #[test]
    fn test_quarter_from_every_month() {
        let quarters: Vec<u8> = (1..=12)
            .map(|m| Quarter::from_month(m).unwrap().number())
            .collect();
        assert_eq!(quarters, [1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]);
        assert_eq!(Quarter::from_month(0), None);
        assert_eq!(Quarter::from_month(13), None);
    }

    #[test]
    fn test_quarter_of_agrees_with_month_formula() {
        for month in 1..=12 {
            let at = NaiveDate::from_ymd_opt(2021, month, 28)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap();
            assert_eq!(Some(Quarter::of(&at)), Quarter::from_month(month));
        }
    }

    #[test]
    fn test_parse_accepts_zulu_and_fraction() {
        let format = DEFAULT_TIMESTAMP_FORMAT;
        let plain = parse_hired_at("2021-01-15T00:00:00", format).unwrap();
        let zulu = parse_hired_at("2021-01-15T00:00:00Z", format).unwrap();
        assert_eq!(plain, zulu);

        let fractional = parse_hired_at("2021-11-07T02:48:42.250Z", format).unwrap();
        assert_eq!(fractional.month(), 11);
        assert_eq!(fractional.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_normalize_derives_year_and_quarter() {
        let options = TemporalOptions::default();
        let normalized = normalize(&hire(1, Some("2021-08-31T23:59:59Z")), &options)
            .unwrap()
            .unwrap();
        assert_eq!(normalized.year, 2021);
        assert_eq!(normalized.quarter.number(), 3);
        assert_eq!(normalized.department_id, Some(1));
    }

    #[test]
    fn test_unparseable_timestamp_fails() {
        let options = TemporalOptions::default();
        let err = normalize_all(
            &[hire(1, Some("2021-01-01T00:00:00")), hire(2, Some("15/01/2021"))],
            &options,
        )
        .unwrap_err();
        match err {
            CoreError::TemporalParseError {
                employee_id, value, ..
            } => {
                assert_eq!(employee_id, 2);
                assert_eq!(value.as_deref(), Some("15/01/2021"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_timestamp_policy() {
        let strict = TemporalOptions::default();
        assert!(normalize(&hire(3, None), &strict).is_err());

        let lenient = TemporalOptions {
            missing: MissingTimestamp::Exclude,
            ..TemporalOptions::default()
        };
        let normalized =
            normalize_all(&[hire(3, None), hire(4, Some("2021-05-05T00:00:00"))], &lenient)
                .unwrap();
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].id, 4);
    }

    #[test]
    fn test_filter_year_drops_other_years() {
        let options = TemporalOptions::default();
        let hires = normalize_all(
            &[
                hire(1, Some("2020-12-31T23:59:59")),
                hire(2, Some("2021-01-01T00:00:00")),
                hire(3, Some("2022-01-01T00:00:00")),
            ],
            &options,
        )
        .unwrap();

        let kept = filter_year(hires, 2021);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 2);
        assert_eq!(kept[0].quarter, Quarter::ALL[0]);
    }
}
