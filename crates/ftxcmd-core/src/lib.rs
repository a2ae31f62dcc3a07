//! Core domain types for the ftxcmd order interpreter.
//!
//! This crate provides fundamental types used throughout the workspace:
//! - `Price`, `Size`: Precision-safe numeric types
//! - `MarketName`: Normalized exchange market identifier (e.g. `XTZ-PERP`)
//! - `OrderSide`, `OrderKind`, `ConditionalFamily`: Trading enums
//! - `OrderIntent`, `ConditionalIntent`, `CancelRequest`: Fully-specified requests
//!   handed to the transport layer

pub mod decimal;
pub mod error;
pub mod intent;
pub mod market;
pub mod order;

pub use decimal::{Price, Size};
pub use error::{CoreError, Result};
pub use intent::{CancelRequest, CancelScope, ConditionalIntent, OrderIntent, Trigger};
pub use market::MarketName;
pub use order::{ClientOrderId, ConditionalFamily, OrderKind, OrderSide};
