//! Risk error types.

use ftxcmd_core::Size;
use thiserror::Error;

/// Why the fat-finger guard refused an order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FatFingerRejection {
    #[error("fatfinger is not set, use: fatfinger SIZE")]
    NotConfigured,

    #[error("size {size} exceeds fatfinger {ceiling}, unable to place order")]
    Exceeded { size: Size, ceiling: Size },
}

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("Order blocked: {0}")]
    Blocked(#[from] FatFingerRejection),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type RiskResult<T> = Result<T, RiskError>;
