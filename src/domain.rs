use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::GpadError;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static ISO_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(0[1-9]|1[0-2])$").expect("ISO month pattern should compile")
});

/// A calendar month in `YYYY-MM` form, e.g. `2025-10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IsoMonth {
    year: u16,
    month: u8,
}

impl IsoMonth {
    pub fn new(year: u16, month: u8) -> Result<Self, GpadError> {
        if !(1..=12).contains(&month) || year > 9999 {
            return Err(GpadError::InvalidMonth(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// The month before the one containing `today`.
    pub fn previous(today: NaiveDate) -> Self {
        let year = today.year() as u16;
        let month = today.month() as u8;
        if month == 1 {
            Self {
                year: year - 1,
                month: 12,
            }
        } else {
            Self {
                year,
                month: month - 1,
            }
        }
    }

    pub fn year(&self) -> String {
        format!("{:04}", self.year)
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[usize::from(self.month) - 1]
    }

    /// Split into the lowercase month name and the four digit year.
    pub fn decompose(&self) -> (&'static str, String) {
        (self.month_name(), self.year())
    }

    /// Trailing fragment of the per-month CSV names inside a release,
    /// e.g. `Oct_25.csv` for `2025-10`.
    pub fn abbreviated_suffix(&self) -> String {
        let name = self.month_name();
        let mut abbrev = name[..3].to_string();
        abbrev[..1].make_ascii_uppercase();
        format!("{abbrev}_{:02}.csv", self.year % 100)
    }
}

impl fmt::Display for IsoMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for IsoMonth {
    type Err = GpadError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let captures = ISO_MONTH
            .captures(trimmed)
            .ok_or_else(|| GpadError::InvalidMonth(value.to_string()))?;
        let year = captures[1]
            .parse::<u16>()
            .map_err(|_| GpadError::InvalidMonth(value.to_string()))?;
        let month = captures[2]
            .parse::<u8>()
            .map_err(|_| GpadError::InvalidMonth(value.to_string()))?;
        Self::new(year, month)
    }
}

impl Serialize for IsoMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_iso_month_valid() {
        let month: IsoMonth = "2025-01".parse().unwrap();
        assert_eq!(month.to_string(), "2025-01");
    }

    #[test]
    fn parse_iso_month_invalid() {
        for value in ["2025-13", "2025-00", "2025-1", "25-01", "january-2025", ""] {
            let err = value.parse::<IsoMonth>().unwrap_err();
            assert_matches!(err, GpadError::InvalidMonth(_));
        }
    }

    #[test]
    fn previous_month_wraps_year() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(IsoMonth::previous(today).to_string(), "2025-12");
    }
}
