//! Hard size guard for ftxcmd orders.
//!
//! Every order, conditional order and split rung passes through
//! [`FatFingerGuard`] immediately before it is handed to the transport.
//! No order whose size is at or above the configured ceiling is ever sent,
//! and with no ceiling configured nothing is sent at all.

pub mod error;
pub mod fat_finger;

pub use error::{FatFingerRejection, RiskError, RiskResult};
pub use fat_finger::{FatFingerCeiling, FatFingerGuard};
