//! Fully-specified order requests.
//!
//! An intent is what the interpreter hands to the transport after a command
//! has been parsed and guarded. Constructors enforce the shape invariants so
//! the transport never has to re-validate:
//! - `OrderIntent`: kind is limit iff a price is present
//! - `ConditionalIntent`: stop/take-profit carry a trigger price, trailing
//!   stops carry a trail value, never both

use crate::error::{CoreError, Result};
use crate::{ClientOrderId, ConditionalFamily, MarketName, OrderKind, OrderSide, Price, Size};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plain (market or limit) order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub market: MarketName,
    pub side: OrderSide,
    pub size: Size,
    /// Limit price. `None` means a market order.
    pub price: Option<Price>,
    pub client_id: ClientOrderId,
}

impl OrderIntent {
    /// Market order.
    pub fn market(market: MarketName, side: OrderSide, size: Size) -> Result<Self> {
        Self::new(market, side, size, None)
    }

    /// Limit order at `price`.
    pub fn limit(market: MarketName, side: OrderSide, size: Size, price: Price) -> Result<Self> {
        Self::new(market, side, size, Some(price))
    }

    fn new(market: MarketName, side: OrderSide, size: Size, price: Option<Price>) -> Result<Self> {
        if !size.is_positive() {
            return Err(CoreError::InvalidSize(size.to_string()));
        }
        if let Some(p) = price {
            if !p.is_positive() {
                return Err(CoreError::InvalidPrice(p.to_string()));
            }
        }
        Ok(Self {
            market,
            side,
            size,
            price,
            client_id: ClientOrderId::new(),
        })
    }

    /// Order kind, derived from the presence of a price.
    pub fn kind(&self) -> OrderKind {
        match self.price {
            Some(_) => OrderKind::Limit,
            None => OrderKind::Market,
        }
    }
}

impl fmt::Display for OrderIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.kind(), self.side, self.size, self.market)?;
        if let Some(price) = self.price {
            write!(f, " @{price}")?;
        }
        Ok(())
    }
}

/// What activates a conditional order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// Fixed trigger price (stop, take-profit).
    Price(Price),
    /// Trail distance from the best price (trailing stop). May be negative.
    Trail(Decimal),
}

/// Conditional (trigger) order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalIntent {
    market: MarketName,
    family: ConditionalFamily,
    side: OrderSide,
    size: Size,
    trigger: Trigger,
    limit_price: Option<Price>,
    client_id: ClientOrderId,
}

impl ConditionalIntent {
    /// Build a conditional intent, rejecting family/trigger mismatches.
    pub fn new(
        market: MarketName,
        family: ConditionalFamily,
        side: OrderSide,
        size: Size,
        trigger: Trigger,
        limit_price: Option<Price>,
    ) -> Result<Self> {
        if !size.is_positive() {
            return Err(CoreError::InvalidSize(size.to_string()));
        }
        match (family.is_trailing(), trigger) {
            (true, Trigger::Price(_)) => {
                return Err(CoreError::InvalidIntent(
                    "trailing stops take a trail value, not a trigger price".to_string(),
                ))
            }
            (false, Trigger::Trail(_)) => {
                return Err(CoreError::InvalidIntent(format!(
                    "{family} orders need a trigger price"
                )))
            }
            (true, Trigger::Trail(value)) if value.is_zero() => {
                return Err(CoreError::InvalidIntent("trail value must be non-zero".to_string()))
            }
            (false, Trigger::Price(p)) if !p.is_positive() => {
                return Err(CoreError::InvalidPrice(p.to_string()))
            }
            _ => {}
        }
        if let Some(p) = limit_price {
            if !p.is_positive() {
                return Err(CoreError::InvalidPrice(p.to_string()));
            }
        }
        Ok(Self {
            market,
            family,
            side,
            size,
            trigger,
            limit_price,
            client_id: ClientOrderId::new(),
        })
    }

    pub fn market(&self) -> &MarketName {
        &self.market
    }

    pub fn family(&self) -> ConditionalFamily {
        self.family
    }

    pub fn side(&self) -> OrderSide {
        self.side
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    /// Trigger price for stop / take-profit orders.
    pub fn trigger_price(&self) -> Option<Price> {
        match self.trigger {
            Trigger::Price(p) => Some(p),
            Trigger::Trail(_) => None,
        }
    }

    /// Trail value for trailing stops.
    pub fn trail_value(&self) -> Option<Decimal> {
        match self.trigger {
            Trigger::Trail(v) => Some(v),
            Trigger::Price(_) => None,
        }
    }

    pub fn limit_price(&self) -> Option<Price> {
        self.limit_price
    }

    pub fn client_id(&self) -> &ClientOrderId {
        &self.client_id
    }
}

impl fmt::Display for ConditionalIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.family, self.side, self.size, self.market)?;
        match self.trigger {
            Trigger::Price(p) => write!(f, " trigger @{p}")?,
            Trigger::Trail(v) => write!(f, " trail {}", v.normalize())?,
        }
        if let Some(limit) = self.limit_price {
            write!(f, " limit @{limit}")?;
        }
        Ok(())
    }
}

/// Which orders a cancel affects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelScope {
    /// Every open order on the market.
    All,
    /// Only resting limit orders.
    LimitOnly,
    /// Only conditional orders; a specific one when an id is given.
    ConditionalOnly(Option<String>),
    /// A single plain order by exchange id.
    ById(String),
}

/// Cancel request for one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
    pub market: MarketName,
    pub scope: CancelScope,
}

impl fmt::Display for CancelRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            CancelScope::All => write!(f, "cancel all orders on {}", self.market),
            CancelScope::LimitOnly => write!(f, "cancel limit orders on {}", self.market),
            CancelScope::ConditionalOnly(None) => {
                write!(f, "cancel conditional orders on {}", self.market)
            }
            CancelScope::ConditionalOnly(Some(id)) => {
                write!(f, "cancel conditional order {id} on {}", self.market)
            }
            CancelScope::ById(id) => write!(f, "cancel order {id} on {}", self.market),
        }
    }
}
