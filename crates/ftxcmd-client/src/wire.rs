//! Request and response bodies exchanged with the REST API.
//!
//! Prices and sizes travel as JSON numbers, hence the explicit
//! `rust_decimal::serde::float*` adapters.

use ftxcmd_core::{
    CancelRequest, CancelScope, ConditionalIntent, OrderIntent, Trigger,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Response envelope: `{"success": true, "result": ...}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST orders` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaceOrderRequest {
    pub market: String,
    pub side: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
    #[serde(rename = "type")]
    pub order_type: String,
    pub reduce_only: bool,
    pub ioc: bool,
    pub post_only: bool,
    pub client_id: Option<String>,
}

impl From<&OrderIntent> for PlaceOrderRequest {
    fn from(intent: &OrderIntent) -> Self {
        Self {
            market: intent.market.to_string(),
            side: intent.side.to_string(),
            price: intent.price.map(|p| p.inner()),
            size: intent.size.inner(),
            order_type: intent.kind().to_string(),
            reduce_only: false,
            ioc: false,
            post_only: false,
            client_id: Some(intent.client_id.to_string()),
        }
    }
}

/// `POST conditional_orders` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaceConditionalRequest {
    pub market: String,
    pub side: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
    #[serde(rename = "type")]
    pub order_type: String,
    pub reduce_only: bool,
    pub cancel_limit_on_trigger: bool,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub trigger_price: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_price: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub trail_value: Option<Decimal>,
    pub client_id: Option<String>,
}

impl From<&ConditionalIntent> for PlaceConditionalRequest {
    fn from(intent: &ConditionalIntent) -> Self {
        let (trigger_price, trail_value) = match intent.trigger() {
            Trigger::Price(p) => (Some(p.inner()), None),
            Trigger::Trail(v) => (None, Some(v)),
        };
        Self {
            market: intent.market().to_string(),
            side: intent.side().to_string(),
            size: intent.size().inner(),
            order_type: intent.family().to_string(),
            reduce_only: true,
            cancel_limit_on_trigger: true,
            trigger_price,
            order_price: intent.limit_price().map(|p| p.inner()),
            trail_value,
            client_id: Some(intent.client_id().to_string()),
        }
    }
}

/// `DELETE orders` body (bulk cancel).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CancelAllRequest {
    pub market: String,
    pub conditional_orders_only: bool,
    pub limit_orders_only: bool,
}

impl CancelAllRequest {
    pub fn for_request(request: &CancelRequest) -> Self {
        Self {
            market: request.market.to_string(),
            conditional_orders_only: matches!(request.scope, CancelScope::ConditionalOnly(_)),
            limit_orders_only: matches!(request.scope, CancelScope::LimitOnly),
        }
    }
}

/// An order as reported by the exchange (plain or conditional).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: u64,
    pub market: String,
    /// `limit`/`market` for plain orders, `stop`/`take_profit`/`trailing_stop` for conditional ones.
    #[serde(rename = "type")]
    pub order_type: String,
    pub side: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub trigger_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub order_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub trail_value: Option<Decimal>,
    /// Execution style of a triggered conditional order (`market`/`limit`).
    #[serde(default)]
    pub order_type_on_trigger: Option<String>,
    #[serde(default)]
    pub reduce_only: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Result of a placement call.
pub type OrderResult = OrderSummary;

impl fmt::Display for OrderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} order {} - market: {}, size: {}, side: {}",
            self.order_type.to_uppercase(),
            self.id,
            self.market,
            self.size.normalize(),
            self.side
        )?;
        if let Some(price) = self.price {
            write!(f, ", price: {}", price.normalize())?;
        }
        if let Some(trigger) = self.trigger_price {
            write!(f, ", triggerPrice: {}", trigger.normalize())?;
        }
        if let Some(trail) = self.trail_value {
            write!(f, ", trailValue: {}", trail.normalize())?;
        }
        if let Some(limit) = self.order_price {
            write!(f, ", limitPrice: {}", limit.normalize())?;
        }
        if self.reduce_only {
            write!(f, ", reduceOnly")?;
        }
        if let Some(status) = &self.status {
            write!(f, " [{status}]")?;
        }
        Ok(())
    }
}

/// Result of a cancel call: the exchange answers with a status sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CancelResult {
    pub message: String,
}

impl fmt::Display for CancelResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// An open futures position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSummary {
    pub future: String,
    pub side: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub net_size: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub entry_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub estimated_liquidation_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub open_size: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub realized_pnl: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub unrealized_pnl: Option<Decimal>,
}

impl PositionSummary {
    /// Flat positions are still listed by the exchange after being closed.
    pub fn is_open(&self) -> bool {
        !self.size.is_zero()
    }
}

fn opt(value: Option<Decimal>) -> String {
    value
        .map(|v| v.normalize().to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for PositionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current position:")?;
        writeln!(f, "  market: {}", self.future)?;
        writeln!(f, "  entryPrice: {}", opt(self.entry_price))?;
        writeln!(f, "  side: {}", self.side)?;
        writeln!(f, "  size: {}", self.size.normalize())?;
        writeln!(f, "  liquidation: {}", opt(self.estimated_liquidation_price))?;
        writeln!(f, "  openSize: {}", opt(self.open_size))?;
        writeln!(f, "  realizedPnl: {}", opt(self.realized_pnl))?;
        write!(f, "  unrealizedPnl: {}", opt(self.unrealized_pnl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftxcmd_core::{ConditionalFamily, MarketName, OrderSide, Price, Size};
    use rust_decimal_macros::dec;

    fn xtz() -> MarketName {
        MarketName::new("XTZ-PERP").unwrap()
    }

    #[test]
    fn test_place_order_market_serializes_null_price() {
        let intent = OrderIntent::market(xtz(), OrderSide::Buy, Size::new(dec!(1))).unwrap();
        let body = serde_json::to_value(PlaceOrderRequest::from(&intent)).unwrap();
        assert_eq!(body["market"], "XTZ-PERP");
        assert_eq!(body["side"], "buy");
        assert_eq!(body["type"], "market");
        assert!(body["price"].is_null());
        assert_eq!(body["size"], 1.0);
        assert_eq!(body["reduceOnly"], false);
        assert_eq!(body["postOnly"], false);
    }

    #[test]
    fn test_place_order_limit_serializes_number_price() {
        let intent = OrderIntent::limit(
            xtz(),
            OrderSide::Sell,
            Size::new(dec!(0.5)),
            Price::new(dec!(8600)),
        )
        .unwrap();
        let body = serde_json::to_value(PlaceOrderRequest::from(&intent)).unwrap();
        assert_eq!(body["type"], "limit");
        assert_eq!(body["price"], 8600.0);
        assert_eq!(body["size"], 0.5);
    }

    #[test]
    fn test_conditional_request_shape() {
        let intent = ConditionalIntent::new(
            xtz(),
            ConditionalFamily::TakeProfit,
            OrderSide::Sell,
            Size::new(dec!(1)),
            Trigger::Price(Price::new(dec!(50))),
            None,
        )
        .unwrap();
        let body = serde_json::to_value(PlaceConditionalRequest::from(&intent)).unwrap();
        assert_eq!(body["type"], "takeProfit");
        assert_eq!(body["triggerPrice"], 50.0);
        assert_eq!(body["reduceOnly"], true);
        assert_eq!(body["cancelLimitOnTrigger"], true);
        assert!(body.get("orderPrice").is_none());
        assert!(body.get("trailValue").is_none());
    }

    #[test]
    fn test_trailing_request_carries_trail_value() {
        let intent = ConditionalIntent::new(
            xtz(),
            ConditionalFamily::TrailingStop,
            OrderSide::Sell,
            Size::new(dec!(1)),
            Trigger::Trail(dec!(-0.05)),
            None,
        )
        .unwrap();
        let body = serde_json::to_value(PlaceConditionalRequest::from(&intent)).unwrap();
        assert_eq!(body["type"], "trailingStop");
        assert_eq!(body["trailValue"], -0.05);
        assert!(body.get("triggerPrice").is_none());
    }

    #[test]
    fn test_cancel_all_flags() {
        let request = CancelRequest {
            market: xtz(),
            scope: CancelScope::LimitOnly,
        };
        let body = serde_json::to_value(CancelAllRequest::for_request(&request)).unwrap();
        assert_eq!(body["limitOrdersOnly"], true);
        assert_eq!(body["conditionalOrdersOnly"], false);
    }

    #[test]
    fn test_order_summary_parses_exchange_payload() {
        let raw = r#"{
            "id": 9596912, "market": "XTZ-PERP", "type": "limit", "side": "buy",
            "price": 1.5, "size": 1.0, "status": "open", "filledSize": 0.0,
            "reduceOnly": false, "ioc": false, "postOnly": false, "clientId": null
        }"#;
        let order: OrderSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(order.id, 9596912);
        assert_eq!(order.price, Some(dec!(1.5)));
        assert_eq!(
            order.to_string(),
            "LIMIT order 9596912 - market: XTZ-PERP, size: 1, side: buy, price: 1.5 [open]"
        );
    }

    #[test]
    fn test_envelope_error() {
        let raw = r#"{"success": false, "error": "Not logged in"}"#;
        let envelope: Envelope<OrderSummary> = serde_json::from_str(raw).unwrap();
        assert!(!envelope.success);
        assert!(envelope.result.is_none());
        assert_eq!(envelope.error.as_deref(), Some("Not logged in"));
    }

    #[test]
    fn test_position_open_filter() {
        let raw = r#"{"future": "XTZ-PERP", "side": "buy", "size": 0.0, "entryPrice": null}"#;
        let position: PositionSummary = serde_json::from_str(raw).unwrap();
        assert!(!position.is_open());
        assert!(position.to_string().contains("entryPrice: -"));
    }
}
