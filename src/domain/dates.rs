use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::RowRejection;

/// Parse `value` against every format in `formats`.
///
/// Formats with a time component produce that time, date-only formats produce
/// midnight. The first successful parse is returned unless a later format
/// yields a different instant, in which case the value is ambiguous.
pub fn parse_datetime(
    value: &str,
    formats: &[String],
    field: &'static str,
) -> Result<NaiveDateTime, RowRejection> {
    let value = value.trim();
    let mut parsed: Option<NaiveDateTime> = None;

    for format in formats {
        let Some(candidate) = parse_with_format(value, format) else {
            continue;
        };

        match parsed {
            None => parsed = Some(candidate),
            Some(first) if first != candidate => {
                return Err(RowRejection::AmbiguousDate {
                    field,
                    value: value.to_string(),
                });
            }
            Some(_) => {}
        }
    }

    parsed.ok_or_else(|| RowRejection::UnparseableDate {
        field,
        value: value.to_string(),
    })
}

/// Like [`parse_datetime`] but only the calendar date is kept
pub fn parse_date(
    value: &str,
    formats: &[String],
    field: &'static str,
) -> Result<NaiveDate, RowRejection> {
    parse_datetime(value, formats, field).map(|dt| dt.date())
}

fn parse_with_format(value: &str, format: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
        return Some(dt);
    }

    NaiveDate::parse_from_str(value, format)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
