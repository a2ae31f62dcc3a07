//! Fat-finger size guard.
//!
//! The ceiling is a per-session maximum order size. The comparison is strict:
//! an order of exactly the ceiling is blocked, so `fatfinger 2` allows at
//! most `1.999...`.

use crate::error::{FatFingerRejection, RiskError, RiskResult};
use ftxcmd_core::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Strictly positive maximum order size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Size", into = "Size")]
pub struct FatFingerCeiling(Size);

impl FatFingerCeiling {
    pub fn new(size: Size) -> RiskResult<Self> {
        if !size.is_positive() {
            return Err(RiskError::ConfigError(format!(
                "fatfinger must be a positive number, got {size}"
            )));
        }
        Ok(Self(size))
    }

    pub fn size(&self) -> Size {
        self.0
    }
}

impl TryFrom<Size> for FatFingerCeiling {
    type Error = RiskError;

    fn try_from(size: Size) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<FatFingerCeiling> for Size {
    fn from(ceiling: FatFingerCeiling) -> Self {
        ceiling.0
    }
}

impl FromStr for FatFingerCeiling {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let size: Size = s
            .parse()
            .map_err(|_| RiskError::ConfigError(format!("please input only digits for fatfinger: {s}")))?;
        Self::new(size)
    }
}

impl fmt::Display for FatFingerCeiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stateless fat-finger check.
///
/// The ceiling lives on the interpreter session; the guard only compares.
#[derive(Debug, Clone, Copy, Default)]
pub struct FatFingerGuard;

impl FatFingerGuard {
    /// `true` iff an order of `size` may reach the transport.
    #[must_use]
    pub fn allow(size: Size, ceiling: Option<FatFingerCeiling>) -> bool {
        Self::check(size, ceiling).is_ok()
    }

    /// Error-carrying form of [`FatFingerGuard::allow`].
    pub fn check(size: Size, ceiling: Option<FatFingerCeiling>) -> Result<(), FatFingerRejection> {
        let Some(ceiling) = ceiling else {
            warn!(size = %size, "Order blocked: fatfinger not configured");
            return Err(FatFingerRejection::NotConfigured);
        };

        if size >= ceiling.size() {
            warn!(size = %size, ceiling = %ceiling, "Order blocked by fatfinger");
            return Err(FatFingerRejection::Exceeded {
                size,
                ceiling: ceiling.size(),
            });
        }

        Ok(())
    }
}
