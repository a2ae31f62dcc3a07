//! Market identification.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exchange market name (e.g. `XTZ-PERP`, `BTC/USD`).
///
/// Always stored upper-cased; the exchange matches names case-sensitively
/// and users type them in whatever case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketName(String);

impl MarketName {
    /// Create a market name, normalizing to upper case.
    pub fn new(name: &str) -> Result<Self, CoreError> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
            return Err(CoreError::InvalidMarket(name.to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MarketName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for MarketName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
