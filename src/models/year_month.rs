//! `YYYYMM` billing-period key.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static YEAR_MONTH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid period '{0}': expected YYYYMM naming a real calendar month")]
pub struct InvalidYearMonth(pub String);

/// One calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub const MIN: YearMonth = YearMonth { year: 1, month: 1 };

    pub fn new(year: i32, month: u32) -> Result<Self, InvalidYearMonth> {
        if !(1..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(InvalidYearMonth(format!("{year:04}{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following calendar month.
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(self) -> NaiveDate {
        // year and month are range-checked on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// The given day of this month, clamped to the month's last day.
    pub fn day(self, day: u32) -> NaiveDate {
        let mut day = day.max(1);
        loop {
            if let Some(date) = NaiveDate::from_ymd_opt(self.year, self.month, day) {
                return date;
            }
            if day <= 28 {
                return self.first_day();
            }
            day -= 1;
        }
    }

    /// Human-readable label, e.g. "January 2026".
    pub fn label(self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    /// Number of months from `self` up to (not including) `end`; zero when `end <= self`.
    pub fn months_until(self, end: YearMonth) -> u32 {
        let from = self.year as i64 * 12 + self.month as i64;
        let to = end.year as i64 * 12 + end.month as i64;
        (to - from).max(0) as u32
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = InvalidYearMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !YEAR_MONTH_PATTERN.is_match(s) {
            return Err(InvalidYearMonth(s.to_string()));
        }
        let year: i32 = s[..4].parse().map_err(|_| InvalidYearMonth(s.to_string()))?;
        let month: u32 = s[4..].parse().map_err(|_| InvalidYearMonth(s.to_string()))?;
        Self::new(year, month).map_err(|_| InvalidYearMonth(s.to_string()))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = InvalidYearMonth;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}
