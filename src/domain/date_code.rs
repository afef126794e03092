//! Period date codes used by the statistics source.
//!
//! Supported encodings:
//!
//! - monthly: `2023M07`, with `2023-07` accepted as a fallback
//! - quarterly: `2021-Q3` (strict, single canonical form)
//! - annual: `2020`
//!
//! Every parsed date is the first day of the period's first month.

use chrono::{Datelike, NaiveDate};

use crate::domain::Frequency;
use crate::error::DateCodeError;

/// Parse a monthly code (`YYYYMmm`, falling back to `YYYY-MM`).
pub fn parse_monthly(code: &str) -> Result<NaiveDate, DateCodeError> {
    parse_period_code(code)
        .or_else(|| parse_dashed_month(code))
        .ok_or_else(|| DateCodeError::InvalidMonthly {
            code: code.to_string(),
        })
}

/// Parse a quarterly code (`YYYY-Qn`, `n` in 1..=4).
pub fn parse_quarterly(code: &str) -> Result<NaiveDate, DateCodeError> {
    let invalid = || DateCodeError::InvalidQuarterly {
        code: code.to_string(),
    };

    let (year, quarter) = code.split_once("-Q").ok_or_else(invalid)?;
    let year = parse_year(year).ok_or_else(invalid)?;
    if quarter.len() != 1 {
        return Err(invalid());
    }
    let quarter = quarter.parse::<u32>().map_err(|_| invalid())?;
    if !(1..=4).contains(&quarter) {
        return Err(DateCodeError::QuarterOutOfRange {
            code: code.to_string(),
            quarter,
        });
    }

    let month = (quarter - 1) * 3 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

/// Parse an annual code (`YYYY`) to January 1st.
pub fn parse_annual(code: &str) -> Result<NaiveDate, DateCodeError> {
    parse_year(code)
        .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .ok_or_else(|| DateCodeError::InvalidAnnual {
            code: code.to_string(),
        })
}

/// Parse `code` with the parser matching `frequency`.
pub fn parse_date_code(frequency: Frequency, code: &str) -> Result<NaiveDate, DateCodeError> {
    match frequency {
        Frequency::Monthly => parse_monthly(code),
        Frequency::Quarterly => parse_quarterly(code),
        Frequency::Annual => parse_annual(code),
    }
}

/// Render the canonical code for a period start date.
pub fn format_date_code(frequency: Frequency, date: NaiveDate) -> String {
    match frequency {
        Frequency::Monthly => format!("{:04}M{:02}", date.year(), date.month()),
        Frequency::Quarterly => format!("{:04}-Q{}", date.year(), (date.month() - 1) / 3 + 1),
        Frequency::Annual => format!("{:04}", date.year()),
    }
}

fn parse_period_code(code: &str) -> Option<NaiveDate> {
    let (year, month) = code.split_once('M')?;
    if month.len() != 2 {
        return None;
    }
    month_start(parse_year(year)?, parse_digits(month)?)
}

fn parse_dashed_month(code: &str) -> Option<NaiveDate> {
    let (year, month) = code.split_once('-')?;
    if month.is_empty() || month.len() > 2 {
        return None;
    }
    month_start(parse_year(year)?, parse_digits(month)?)
}

fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Exactly four ASCII digits.
fn parse_year(raw: &str) -> Option<i32> {
    if raw.len() != 4 {
        return None;
    }
    parse_digits(raw).map(|y| y as i32)
}

fn parse_digits(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
