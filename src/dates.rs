use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse an ISO-8601 application date.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time part separated by `T`
/// or a space (`2024-09-15T10:30:00`, `2024-09-15 10:30`), with an optional
/// UTC offset (`2024-09-15T10:30:00+02:00`, `2024-09-15T10:30:00Z`). Only the
/// calendar date as written is kept; offsets are not converted. Surrounding whitespace is ignored. Returns `None` when
/// parsing fails.
pub fn parse_applied_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"] {
        if let Ok(datetime) = DateTime::parse_from_str(value, format) {
            return Some(datetime.date_naive());
        }
    }
    None
}

/// Whole calendar days from `date` to `today`. Negative for future dates.
pub fn days_between(today: NaiveDate, date: NaiveDate) -> i64 {
    today.signed_duration_since(date).num_days()
}

/// Elapsed days for a raw `applied_date` cell, or `None` when it cannot be parsed.
pub fn elapsed_days_from_cell(today: NaiveDate, cell: Option<&str>) -> Option<f64> {
    let date = parse_applied_date(cell?)?;
    Some(days_between(today, date) as f64)
}

/// Coerce a raw `days_since_apply` cell to a number.
///
/// Non-numeric text and non-finite values (`NaN`, `inf`, overflow) are unknown.
pub fn parse_days_since_apply(cell: Option<&str>) -> Option<f64> {
    let parsed = cell?.trim().parse::<f64>().ok()?;
    if parsed.is_finite() { Some(parsed) } else { None }
}
