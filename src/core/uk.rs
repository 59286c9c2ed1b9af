use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Rate band of the income tax scale (rUK).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaxBand {
    #[default]
    Basic,
    Higher,
    Additional,
}

impl TaxBand {
    pub const ALL: [TaxBand; 3] = [TaxBand::Basic, TaxBand::Higher, TaxBand::Additional];

    pub fn name(&self) -> &'static str {
        match self {
            TaxBand::Basic => "Basic",
            TaxBand::Higher => "Higher",
            TaxBand::Additional => "Additional",
        }
    }
}

impl fmt::Display for TaxBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// UK Tax Year (runs 6 April to 5 April)
/// The year value represents the end year (e.g., 2025 = 2024/25 tax year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxYear(pub i32);

impl TaxYear {
    /// Tax year containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        let year = date.year();
        // 6 April onwards belongs to the year ending next April
        if (date.month(), date.day()) >= (4, 6) {
            TaxYear(year + 1)
        } else {
            TaxYear(year)
        }
    }

    /// 6 April of the previous calendar year
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0 - 1, 4, 6)
    }

    /// 5 April
    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, 4, 5)
    }

    /// Label in "2024/25" format, as used to key tax year configurations
    pub fn label(&self) -> String {
        format!("{}/{:02}", self.0 - 1, self.0.rem_euclid(100))
    }
}

impl fmt::Display for TaxYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid tax year '{0}': expected e.g. 2024/25 or 2025")]
pub struct ParseTaxYearError(String);

impl FromStr for TaxYear {
    type Err = ParseTaxYearError;

    /// Accepts "2024/25", "2024-25" or the end year alone ("2025")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTaxYearError(s.to_string());
        let s = s.trim();
        match s.split_once(['/', '-']) {
            Some((start, end)) => {
                let start: i32 = start.parse().map_err(|_| err())?;
                if end.len() != 2 {
                    return Err(err());
                }
                let end: i32 = end.parse().map_err(|_| err())?;
                if (start + 1).rem_euclid(100) != end {
                    return Err(err());
                }
                Ok(TaxYear(start + 1))
            }
            None => s.parse().map(TaxYear).map_err(|_| err()),
        }
    }
}
