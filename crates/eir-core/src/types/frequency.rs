//! Payment frequency.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Interest payment frequency of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Monthly payments (12 per year)
    Monthly,
    /// Quarterly payments (4 per year)
    Quarterly,
    /// Semi-annual payments (2 per year)
    #[default]
    SemiAnnual,
    /// Annual payments (1 per year)
    Annual,
}

impl Frequency {
    /// Returns the number of periods per year.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        12 / self.months_per_period()
    }

    /// Returns the number of months per period.
    #[must_use]
    pub fn months_per_period(&self) -> u32 {
        match self {
            Frequency::Monthly => 1,
            Frequency::Quarterly => 3,
            Frequency::SemiAnnual => 6,
            Frequency::Annual => 12,
        }
    }

    /// Looks up the frequency with the given period length in months.
    #[must_use]
    pub fn from_months(months: u32) -> Option<Self> {
        match months {
            1 => Some(Frequency::Monthly),
            3 => Some(Frequency::Quarterly),
            6 => Some(Frequency::SemiAnnual),
            12 => Some(Frequency::Annual),
            _ => None,
        }
    }

    /// Returns the identifier used in deal files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::SemiAnnual => "semi_annual",
            Frequency::Annual => "annual",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Annual => "Annual",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "monthly" | "1" => Ok(Frequency::Monthly),
            "quarterly" | "3" => Ok(Frequency::Quarterly),
            "semi_annual" | "semiannual" | "6" => Ok(Frequency::SemiAnnual),
            "annual" | "12" => Ok(Frequency::Annual),
            _ => Err(CoreError::InvalidFrequency {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_months_per_period() {
        assert_eq!(Frequency::Monthly.months_per_period(), 1);
        assert_eq!(Frequency::Quarterly.months_per_period(), 3);
        assert_eq!(Frequency::SemiAnnual.months_per_period(), 6);
        assert_eq!(Frequency::Annual.months_per_period(), 12);
    }

    #[test]
    fn test_periods_per_year() {
        assert_eq!(Frequency::Monthly.periods_per_year(), 12);
        assert_eq!(Frequency::SemiAnnual.periods_per_year(), 2);
    }

    #[test]
    fn test_from_months() {
        assert_eq!(Frequency::from_months(3), Some(Frequency::Quarterly));
        assert_eq!(Frequency::from_months(2), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("semi_annual".parse::<Frequency>().unwrap(), Frequency::SemiAnnual);
        assert_eq!("Semi-Annual".parse::<Frequency>().unwrap(), Frequency::SemiAnnual);
        assert_eq!("MONTHLY".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert!("weekly".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Frequency::SemiAnnual).unwrap();
        assert_eq!(json, "\"semi_annual\"");
        let parsed: Frequency = serde_json::from_str("\"quarterly\"").unwrap();
        assert_eq!(parsed, Frequency::Quarterly);
    }
}
