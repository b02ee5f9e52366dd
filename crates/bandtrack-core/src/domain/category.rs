use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Index/category groupings supplied by the symbol source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Nifty50,
    Smallcap100,
    Midcap100,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::Nifty50, Self::Smallcap100, Self::Midcap100];

    /// Worksheet title used both for reading the symbol list and in the
    /// output worksheet name template.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nifty50 => "Nifty50",
            Self::Smallcap100 => "Smallcap100",
            Self::Midcap100 => "Midcap100",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nifty50" => Ok(Self::Nifty50),
            "smallcap100" => Ok(Self::Smallcap100),
            "midcap100" => Ok(Self::Midcap100),
            other => Err(ValidationError::InvalidCategory {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_category_case_insensitively() {
        let category = Category::from_str("NIFTY50").expect("must parse");
        assert_eq!(category, Category::Nifty50);
    }

    #[test]
    fn rejects_unknown_category() {
        let err = Category::from_str("Nifty100").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidCategory { .. }));
    }
}
