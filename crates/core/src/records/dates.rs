//! Flexible date normalization for spreadsheet ingestion.
//!
//! Uploaded sheets carry dates either as Excel serial numbers or as
//! day/month/year strings with `/`, `-`, or `.` separators. Both are
//! normalized to a [`NaiveDate`]; anything unparseable becomes `None` so a
//! bad cell never fails a whole batch.

use chrono::{Duration, NaiveDate};

/// Excel's day-serial epoch. Serial `n` maps to `epoch + (n - 1)` days, which
/// agrees with real Excel serials for every date after February 1900 (Excel's
/// phantom 1900-02-29 absorbs the off-by-one for earlier dates).
fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 31).expect("static date")
}

/// Parses a raw spreadsheet cell into a date.
///
/// Accepts Excel day serials (`"45292"` → 2024-01-01) and `d/m/y` strings
/// (`"02-05-2024"`, `"2.5.2024"`). Returns `None` for empty or invalid input.
pub fn parse_flexible_date(input: &str) -> Option<NaiveDate> {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '"' | '\''))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(serial) = cleaned.parse::<i64>() {
        if serial <= 0 {
            return None;
        }
        return excel_epoch().checked_add_signed(Duration::days(serial - 1));
    }

    let parts: Vec<&str> = cleaned.split(['/', '-', '.']).collect();
    if parts.len() != 3 {
        return None;
    }
    // A four-digit leading part means the date is already year-first
    let (year_part, month_part, day_part) = if parts[0].trim().len() == 4 {
        (parts[0], parts[1], parts[2])
    } else {
        (parts[2], parts[1], parts[0])
    };
    let day: u32 = day_part.trim().parse().ok()?;
    let month: u32 = month_part.trim().parse().ok()?;
    let year: i32 = year_part.trim().parse().ok()?;
    if !(1000..=9999).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}
