//! In-memory exchange for testing.
//!
//! Records every call and answers with canned data. Placement results echo
//! the submitted intent with a sequential order id.

use std::sync::atomic::{AtomicU64, Ordering};

use ftxcmd_core::{CancelRequest, ConditionalIntent, MarketName, OrderIntent, Trigger};
use parking_lot::Mutex;

use crate::error::{ClientError, ClientResult};
use crate::exchange::{BoxFuture, Exchange};
use crate::wire::{CancelResult, OrderResult, OrderSummary, PositionSummary};

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeCall {
    PlaceOrder(OrderIntent),
    PlaceConditional(ConditionalIntent),
    Cancel(CancelRequest),
    ListOrders(MarketName),
    ListConditional(MarketName),
    ListPositions,
}

/// Mock exchange for testing.
#[derive(Debug)]
pub struct MockExchange {
    /// Recorded calls for verification.
    calls: Mutex<Vec<ExchangeCall>>,
    /// When set, every call fails with this exchange error.
    failure: Mutex<Option<String>>,
    open_orders: Mutex<Vec<OrderSummary>>,
    conditional_orders: Mutex<Vec<OrderSummary>>,
    positions: Mutex<Vec<PositionSummary>>,
    next_id: AtomicU64,
}

impl Default for MockExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExchange {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            open_orders: Mutex::new(Vec::new()),
            conditional_orders: Mutex::new(Vec::new()),
            positions: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Make every subsequent call fail with `message`; `None` restores success.
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.lock() = message.map(str::to_string);
    }

    pub fn set_open_orders(&self, orders: Vec<OrderSummary>) {
        *self.open_orders.lock() = orders;
    }

    pub fn set_conditional_orders(&self, orders: Vec<OrderSummary>) {
        *self.conditional_orders.lock() = orders;
    }

    pub fn set_positions(&self, positions: Vec<PositionSummary>) {
        *self.positions.lock() = positions;
    }

    /// Get recorded calls.
    pub fn calls(&self) -> Vec<ExchangeCall> {
        self.calls.lock().clone()
    }

    /// Recorded plain order placements.
    pub fn placed_orders(&self) -> Vec<OrderIntent> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                ExchangeCall::PlaceOrder(i) => Some(i.clone()),
                _ => None,
            })
            .collect()
    }

    /// Recorded conditional placements.
    pub fn placed_conditionals(&self) -> Vec<ConditionalIntent> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                ExchangeCall::PlaceConditional(i) => Some(i.clone()),
                _ => None,
            })
            .collect()
    }

    /// Recorded cancel requests.
    pub fn cancels(&self) -> Vec<CancelRequest> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                ExchangeCall::Cancel(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ExchangeCall) -> ClientResult<()> {
        self.calls.lock().push(call);
        match self.failure.lock().as_ref() {
            Some(message) => Err(ClientError::Exchange(message.clone())),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Exchange for MockExchange {
    fn place_order(&self, intent: OrderIntent) -> BoxFuture<'_, ClientResult<OrderResult>> {
        Box::pin(async move {
            self.record(ExchangeCall::PlaceOrder(intent.clone()))?;
            Ok(OrderSummary {
                id: self.next_id(),
                market: intent.market.to_string(),
                order_type: intent.kind().to_string(),
                side: intent.side.to_string(),
                size: intent.size.inner(),
                price: intent.price.map(|p| p.inner()),
                trigger_price: None,
                order_price: None,
                trail_value: None,
                order_type_on_trigger: None,
                reduce_only: false,
                status: Some("new".to_string()),
                client_id: Some(intent.client_id.to_string()),
            })
        })
    }

    fn place_conditional_order(
        &self,
        intent: ConditionalIntent,
    ) -> BoxFuture<'_, ClientResult<OrderResult>> {
        Box::pin(async move {
            self.record(ExchangeCall::PlaceConditional(intent.clone()))?;
            let (trigger_price, trail_value) = match intent.trigger() {
                Trigger::Price(p) => (Some(p.inner()), None),
                Trigger::Trail(v) => (None, Some(v)),
            };
            Ok(OrderSummary {
                id: self.next_id(),
                market: intent.market().to_string(),
                order_type: intent.family().to_string(),
                side: intent.side().to_string(),
                size: intent.size().inner(),
                price: None,
                trigger_price,
                order_price: intent.limit_price().map(|p| p.inner()),
                trail_value,
                order_type_on_trigger: Some(
                    if intent.limit_price().is_some() { "limit" } else { "market" }.to_string(),
                ),
                reduce_only: true,
                status: Some("open".to_string()),
                client_id: Some(intent.client_id().to_string()),
            })
        })
    }

    fn cancel_orders(&self, request: CancelRequest) -> BoxFuture<'_, ClientResult<CancelResult>> {
        Box::pin(async move {
            self.record(ExchangeCall::Cancel(request))?;
            Ok(CancelResult {
                message: "Orders queued for cancelation".to_string(),
            })
        })
    }

    fn list_open_orders(
        &self,
        market: MarketName,
    ) -> BoxFuture<'_, ClientResult<Vec<OrderSummary>>> {
        Box::pin(async move {
            self.record(ExchangeCall::ListOrders(market.clone()))?;
            Ok(self
                .open_orders
                .lock()
                .iter()
                .filter(|o| o.market == market.as_str())
                .cloned()
                .collect())
        })
    }

    fn list_open_conditional_orders(
        &self,
        market: MarketName,
    ) -> BoxFuture<'_, ClientResult<Vec<OrderSummary>>> {
        Box::pin(async move {
            self.record(ExchangeCall::ListConditional(market.clone()))?;
            Ok(self
                .conditional_orders
                .lock()
                .iter()
                .filter(|o| o.market == market.as_str())
                .cloned()
                .collect())
        })
    }

    fn list_positions(&self) -> BoxFuture<'_, ClientResult<Vec<PositionSummary>>> {
        Box::pin(async move {
            self.record(ExchangeCall::ListPositions)?;
            Ok(self.positions.lock().clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftxcmd_core::{OrderSide, Size};
    use rust_decimal_macros::dec;

    fn xtz() -> MarketName {
        MarketName::new("XTZ-PERP").unwrap()
    }

    #[tokio::test]
    async fn test_mock_records_and_echoes() {
        let mock = MockExchange::new();
        let intent = OrderIntent::market(xtz(), OrderSide::Buy, Size::new(dec!(1))).unwrap();

        let result = mock.place_order(intent.clone()).await.unwrap();
        assert_eq!(result.id, 1);
        assert_eq!(result.order_type, "market");
        assert_eq!(mock.placed_orders(), vec![intent]);
    }

    #[tokio::test]
    async fn test_mock_failure_still_records() {
        let mock = MockExchange::new();
        mock.set_failure(Some("Not enough balances"));

        let err = mock.list_positions().await.unwrap_err();
        assert!(matches!(err, ClientError::Exchange(ref m) if m == "Not enough balances"));
        assert_eq!(mock.calls(), vec![ExchangeCall::ListPositions]);
    }

    #[tokio::test]
    async fn test_mock_filters_orders_by_market() {
        let mock = MockExchange::new();
        let order = |market: &str| OrderSummary {
            id: 7,
            market: market.to_string(),
            order_type: "limit".to_string(),
            side: "buy".to_string(),
            size: dec!(1),
            price: Some(dec!(1)),
            trigger_price: None,
            order_price: None,
            trail_value: None,
            order_type_on_trigger: None,
            reduce_only: false,
            status: Some("open".to_string()),
            client_id: None,
        };
        mock.set_open_orders(vec![order("XTZ-PERP"), order("BTC-PERP")]);

        let orders = mock.list_open_orders(xtz()).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].market, "XTZ-PERP");
    }
}
