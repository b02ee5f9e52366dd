use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Supported tracking timeframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Daily,
    Hourly,
}

impl Timeframe {
    pub const ALL: [Self; 2] = [Self::Daily, Self::Hourly];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Hourly => "hourly",
        }
    }

    /// Capitalized form used in worksheet name templates.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Hourly => "Hourly",
        }
    }

    /// Provider interval parameter for this timeframe.
    pub const fn interval_param(self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Hourly => "1h",
        }
    }

    /// Lookback window in calendar days.
    ///
    /// Daily uses 400 days to cover 200 trading days; hourly is capped at
    /// 60 days by the provider's intraday window limit.
    pub const fn lookback_days(self) -> i64 {
        match self {
            Self::Daily => 400,
            Self::Hourly => 60,
        }
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "1d" => Ok(Self::Daily),
            "hourly" | "1h" => Ok(Self::Hourly),
            other => Err(ValidationError::InvalidTimeframe {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timeframe() {
        let timeframe = Timeframe::from_str("daily").expect("must parse");
        assert_eq!(timeframe, Timeframe::Daily);
        assert_eq!(Timeframe::from_str("1h").expect("must parse"), Timeframe::Hourly);
    }

    #[test]
    fn rejects_invalid_timeframe() {
        let err = Timeframe::from_str("weekly").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidTimeframe { .. }));
    }

    #[test]
    fn hourly_lookback_respects_provider_cap() {
        assert_eq!(Timeframe::Hourly.lookback_days(), 60);
    }
}
