//! External date format handling
//!
//! Remittance and shipping-bill dates cross the system boundary as
//! `dd-mm-yyyy` strings. Internally every date is a [`chrono::NaiveDate`] so
//! chronological order and sort order always agree; conversion happens exactly
//! once, here.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors related to external date handling
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("Invalid date: '{0}' (expected dd-mm-yyyy)")]
    InvalidDate(String),
}

/// Parses an external `dd-mm-yyyy` date
///
/// Requires exactly two day digits, two month digits, and a four-digit year,
/// and validates the calendar (no 31-04, leap years respected).
pub fn parse_external(raw: &str) -> Result<NaiveDate, DateError> {
    let invalid = || DateError::InvalidDate(raw.to_string());

    let trimmed = raw.trim();
    let parts: Vec<&str> = trimmed.split('-').collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(invalid());
    };

    if day.len() != 2 || month.len() != 2 || year.len() != 4 {
        return Err(invalid());
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return Err(invalid());
    }

    let day: u32 = day.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Formats a date back into the external `dd-mm-yyyy` form
pub fn format_external(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let d = parse_external("15-06-2024").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    }

    #[test]
    fn test_parse_leap_day() {
        assert!(parse_external("29-02-2024").is_ok());
        assert!(parse_external("29-02-2023").is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(parse_external("31-04-2024").is_err());
        assert!(parse_external("00-01-2024").is_err());
        assert!(parse_external("15-13-2024").is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        for raw in ["2024-06-15", "5-6-2024", "15/06/2024", "15-06-24", "", "15-06-2024-01"] {
            assert!(parse_external(raw).is_err(), "expected rejection of {raw:?}");
        }
    }

    #[test]
    fn test_round_trip() {
        let raw = "01-01-2025";
        assert_eq!(format_external(parse_external(raw).unwrap()), raw);
    }
}
