//! Exchange trait for order placement and account queries.
//!
//! The interpreter depends on this trait only, so tests can swap in
//! [`crate::MockExchange`] and the binary wires in [`crate::RestClient`].

use std::pin::Pin;
use std::sync::Arc;

use ftxcmd_core::{CancelRequest, ConditionalIntent, MarketName, OrderIntent};

use crate::error::ClientResult;
use crate::wire::{CancelResult, OrderResult, OrderSummary, PositionSummary};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Operations the interpreter needs from an exchange.
///
/// Every call is a single request: no retries, no batching. Errors are
/// returned to the caller, which reports them and moves on.
pub trait Exchange: Send + Sync {
    /// Submit a market or limit order.
    fn place_order(&self, intent: OrderIntent) -> BoxFuture<'_, ClientResult<OrderResult>>;

    /// Submit a stop, take-profit or trailing-stop order.
    fn place_conditional_order(
        &self,
        intent: ConditionalIntent,
    ) -> BoxFuture<'_, ClientResult<OrderResult>>;

    /// Cancel orders on one market.
    fn cancel_orders(&self, request: CancelRequest) -> BoxFuture<'_, ClientResult<CancelResult>>;

    /// Open plain orders on `market`.
    fn list_open_orders(&self, market: MarketName)
        -> BoxFuture<'_, ClientResult<Vec<OrderSummary>>>;

    /// Open conditional orders on `market`.
    fn list_open_conditional_orders(
        &self,
        market: MarketName,
    ) -> BoxFuture<'_, ClientResult<Vec<OrderSummary>>>;

    /// All positions on the account, including flat ones.
    fn list_positions(&self) -> BoxFuture<'_, ClientResult<Vec<PositionSummary>>>;
}

/// Arc wrapper for Exchange trait objects.
pub type DynExchange = Arc<dyn Exchange>;

impl<E: Exchange + ?Sized> Exchange for Arc<E> {
    fn place_order(&self, intent: OrderIntent) -> BoxFuture<'_, ClientResult<OrderResult>> {
        (**self).place_order(intent)
    }

    fn place_conditional_order(
        &self,
        intent: ConditionalIntent,
    ) -> BoxFuture<'_, ClientResult<OrderResult>> {
        (**self).place_conditional_order(intent)
    }

    fn cancel_orders(&self, request: CancelRequest) -> BoxFuture<'_, ClientResult<CancelResult>> {
        (**self).cancel_orders(request)
    }

    fn list_open_orders(
        &self,
        market: MarketName,
    ) -> BoxFuture<'_, ClientResult<Vec<OrderSummary>>> {
        (**self).list_open_orders(market)
    }

    fn list_open_conditional_orders(
        &self,
        market: MarketName,
    ) -> BoxFuture<'_, ClientResult<Vec<OrderSummary>>> {
        (**self).list_open_conditional_orders(market)
    }

    fn list_positions(&self) -> BoxFuture<'_, ClientResult<Vec<PositionSummary>>> {
        (**self).list_positions()
    }
}
