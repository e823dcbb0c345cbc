//! Time control system for filtering records by month range

use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar month, keyed as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(NaiveDate);

impl Month {
    /// Build from year and month number (1-12)
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Month)
    }

    /// Parse a `YYYY-MM` key
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let trimmed = value.trim();
        let invalid = || CoreError::InvalidMonth { value: value.to_string() };
        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Month::new(year, month).ok_or_else(invalid)
    }

    /// `YYYY-MM` key
    pub fn key(&self) -> String {
        self.0.format("%Y-%m").to_string()
    }

    /// Display label such as `Jan 2025`
    pub fn label(&self) -> String {
        self.0.format("%b %Y").to_string()
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Month {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::parse(s)
    }
}

impl TryFrom<String> for Month {
    type Error = CoreError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Month::parse(&value)
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.key()
    }
}

/// Selected start/end months (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    pub start: Month,
    pub end: Month,
}

impl MonthRange {
    pub fn new(start: Month, end: Month) -> Self {
        Self { start, end }
    }

    /// Parse `YYYY-MM` start and end keys
    pub fn parse(start: &str, end: &str) -> Result<Self, CoreError> {
        Ok(Self::new(Month::parse(start)?, Month::parse(end)?))
    }

    /// A range whose start is after its end selects nothing
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Check if a month is within the range
    pub fn contains(&self, month: &Month) -> bool {
        !self.is_inverted() && *month >= self.start && *month <= self.end
    }

    /// Get a human-readable description of the range
    pub fn description(&self) -> String {
        if self.start == self.end {
            self.start.label()
        } else {
            format!("{} – {}", self.start.label(), self.end.label())
        }
    }
}
