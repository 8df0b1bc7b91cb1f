//! Date-range validation and the revenue result type.
//!
//! A [`DateRange`] can only be obtained through [`DateRange::parse`] or
//! [`DateRange::new`], so holding one means the staged checks already passed.

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use thiserror::Error;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{:#}` renders the capitalised form used at the start of a sentence.
        match (self, f.alternate()) {
            (DateField::Start, false) => f.write_str("start date"),
            (DateField::Start, true) => f.write_str("Start date"),
            (DateField::End, false) => f.write_str("end date"),
            (DateField::End, true) => f.write_str("End date"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RevenueQueryError {
    #[error("Both start date and end date are required.")]
    MissingDate,
    #[error("Invalid {field} format '{value}'. Use YYYY-MM-DD.")]
    MalformedDate { field: DateField, value: String },
    #[error("{field:#} {value}: date does not exist.")]
    NonexistentDate { field: DateField, value: String },
    #[error("Start Date cannot be after End Date.")]
    StartAfterEnd,
    #[error("No orders found in the selected date range.")]
    NoOrdersFound,
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl RevenueQueryError {
    /// Conditions shown to the user; everything else is a server fault.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, RevenueQueryError::Store(_))
    }
}

/// Inclusive calendar range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RevenueQueryError> {
        if start > end {
            return Err(RevenueQueryError::StartAfterEnd);
        }
        Ok(Self { start, end })
    }

    /// Presence, then shape, then calendar validity, then ordering.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, RevenueQueryError> {
        let present: fn(Option<&str>) -> Option<&str> = |v| v.map(str::trim).filter(|v| !v.is_empty());
        let (Some(start), Some(end)) = (present(start), present(end)) else {
            return Err(RevenueQueryError::MissingDate);
        };

        let start_parts = check_shape(DateField::Start, start)?;
        let end_parts = check_shape(DateField::End, end)?;

        let start = to_calendar_date(DateField::Start, start, start_parts)?;
        let end = to_calendar_date(DateField::End, end, end_parts)?;

        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

fn check_shape(field: DateField, value: &str) -> Result<(i32, u32, u32), RevenueQueryError> {
    let malformed = || RevenueQueryError::MalformedDate {
        field,
        value: value.to_string(),
    };

    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(malformed());
    }
    let all_digits = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
    if !(all_digits(0..4) && all_digits(5..7) && all_digits(8..10)) {
        return Err(malformed());
    }

    let year: i32 = value[0..4].parse().map_err(|_| malformed())?;
    let month: u32 = value[5..7].parse().map_err(|_| malformed())?;
    let day: u32 = value[8..10].parse().map_err(|_| malformed())?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(malformed());
    }
    Ok((year, month, day))
}

fn to_calendar_date(
    field: DateField,
    value: &str,
    (year, month, day): (i32, u32, u32),
) -> Result<NaiveDate, RevenueQueryError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| RevenueQueryError::NonexistentDate {
        field,
        value: value.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevenueReport {
    pub range: DateRange,
    /// Rounded to two decimal places.
    pub total: BigDecimal,
}
