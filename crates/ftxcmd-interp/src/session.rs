//! Per-session interpreter state.

use ftxcmd_core::{MarketName, OrderSide};
use ftxcmd_risk::FatFingerCeiling;

use crate::error::{CommandError, CommandResult};

/// State carried between input lines. Owned by the REPL loop and passed
/// `&mut` into every call; nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Market used by every order command (`instrument`).
    pub market: Option<MarketName>,
    /// Maximum order size (`fatfinger`). Unset blocks all orders.
    pub ceiling: Option<FatFingerCeiling>,
    /// Side of the most recent buy/sell, used to infer conditional sides.
    pub last_side: Option<OrderSide>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_market(mut self, market: MarketName) -> Self {
        self.market = Some(market);
        self
    }

    pub fn with_ceiling(mut self, ceiling: FatFingerCeiling) -> Self {
        self.ceiling = Some(ceiling);
        self
    }

    /// Selected market, or `MissingMarket`.
    pub fn require_market(&self) -> CommandResult<&MarketName> {
        self.market.as_ref().ok_or(CommandError::MissingMarket)
    }
}
