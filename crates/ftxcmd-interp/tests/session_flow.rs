//! End-to-end command lines against the in-memory exchange.

use std::sync::Arc;

use ftxcmd_client::{ExchangeCall, MockExchange, PositionSummary};
use ftxcmd_core::{
    CancelScope, ConditionalFamily, MarketName, OrderKind, OrderSide, Price, Size,
};
use ftxcmd_interp::{Interpreter, RecordingReporter, Report, Session};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

type TestInterpreter = Interpreter<Arc<MockExchange>, Arc<RecordingReporter>>;

fn interpreter() -> TestInterpreter {
    Interpreter::new(Arc::new(MockExchange::new()), Arc::new(RecordingReporter::new()))
}

async fn ready_session(interp: &TestInterpreter, ceiling: &str) -> Session {
    let mut session = Session::new();
    interp
        .handle_line(&mut session, &format!("instrument XTZ-PERP; fatfinger {ceiling}"))
        .await;
    interp.reporter().clear();
    session
}

#[tokio::test]
async fn test_setup_then_limit_buy() {
    let interp = interpreter();
    let mut session = Session::new();

    interp
        .handle_line(&mut session, "instrument XTZ-PERP; fatfinger 2; buy 1 @1")
        .await;

    assert_eq!(session.market.as_ref().unwrap().as_str(), "XTZ-PERP");
    assert_eq!(session.ceiling.unwrap().size(), Size::new(dec!(2)));
    assert_eq!(session.last_side, Some(OrderSide::Buy));

    let placed = interp.exchange().placed_orders();
    assert_eq!(placed.len(), 1);
    let order = &placed[0];
    assert_eq!(order.side, OrderSide::Buy);
    assert_eq!(order.size, Size::new(dec!(1)));
    assert_eq!(order.kind(), OrderKind::Limit);
    assert_eq!(order.price, Some(Price::new(dec!(1))));
    assert_eq!(order.market.as_str(), "XTZ-PERP");
    assert!(interp.reporter().errors().is_empty());
}

#[tokio::test]
async fn test_oversized_order_never_reaches_exchange() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "2").await;

    interp.handle_line(&mut session, "buy 5").await;

    assert!(interp.exchange().calls().is_empty());
    let errors = interp.reporter().errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0], "size 5 exceeds fatfinger 2, unable to place order");
    // Inference state still follows the blocked order.
    assert_eq!(session.last_side, Some(OrderSide::Buy));
}

#[tokio::test]
async fn test_order_at_exact_ceiling_is_blocked() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "2").await;

    interp.handle_line(&mut session, "sell 2 @100; sell 1.99 @100").await;

    let placed = interp.exchange().placed_orders();
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].size, Size::new(dec!(1.99)));
    assert_eq!(interp.reporter().errors().len(), 1);
}

#[tokio::test]
async fn test_no_ceiling_blocks_everything() {
    let interp = interpreter();
    let mut session = Session::new();

    interp
        .handle_line(&mut session, "instrument XTZ-PERP; buy 0.001; tp 0.001 @5")
        .await;

    assert!(interp.exchange().calls().is_empty());
    assert_eq!(interp.reporter().errors().len(), 2);
}

#[tokio::test]
async fn test_take_profit_after_buy_is_sell() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "2").await;

    interp.handle_line(&mut session, "buy 1; tp 1 @50").await;

    let conditionals = interp.exchange().placed_conditionals();
    assert_eq!(conditionals.len(), 1);
    let tp = &conditionals[0];
    assert_eq!(tp.family(), ConditionalFamily::TakeProfit);
    assert_eq!(tp.side(), OrderSide::Sell);
    assert_eq!(tp.trigger_price(), Some(Price::new(dec!(50))));
    assert_eq!(tp.market().as_str(), "XTZ-PERP");
}

#[tokio::test]
async fn test_stop_after_sell_is_buy() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "2").await;

    interp.handle_line(&mut session, "sell 1 @100; stop 1 @110").await;

    let conditionals = interp.exchange().placed_conditionals();
    assert_eq!(conditionals[0].side(), OrderSide::Buy);
    assert_eq!(conditionals[0].family(), ConditionalFamily::Stop);
}

#[tokio::test]
async fn test_conditional_without_side_is_rejected() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "2").await;

    interp.handle_line(&mut session, "stop 1 @110").await;

    assert!(interp.exchange().calls().is_empty());
    let errors = interp.reporter().errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("side unknown"));
}

#[tokio::test]
async fn test_oversized_conditional_is_blocked() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "2").await;

    interp.handle_line(&mut session, "buy 1; trail 3 -0.5").await;

    assert!(interp.exchange().placed_conditionals().is_empty());
    assert_eq!(interp.reporter().errors().len(), 1);
}

#[tokio::test]
async fn test_failure_in_one_sub_command_keeps_going() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "10").await;

    interp
        .handle_line(&mut session, "buy; buy 1 @x; sell 1 @100; bogus; buy 2")
        .await;

    let placed = interp.exchange().placed_orders();
    assert_eq!(placed.len(), 2);
    assert_eq!(placed[0].side, OrderSide::Sell);
    assert_eq!(placed[1].kind(), OrderKind::Market);
    assert_eq!(interp.reporter().errors().len(), 3);
    assert_eq!(interp.reporter().successes().len(), 2);
}

#[tokio::test]
async fn test_split_buy_places_ladder_end_first() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "5").await;

    interp
        .handle_line(&mut session, "split buy 10 into 5 from 100 to 110")
        .await;

    let placed = interp.exchange().placed_orders();
    let prices: Vec<Decimal> = placed.iter().map(|o| o.price.unwrap().inner()).collect();
    assert_eq!(
        prices,
        vec![dec!(110), dec!(107.5), dec!(105), dec!(102.5), dec!(100)]
    );
    for order in &placed {
        assert_eq!(order.size, Size::new(dec!(2)));
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.kind(), OrderKind::Limit);
    }
    assert!(interp.reporter().errors().is_empty());
}

#[tokio::test]
async fn test_split_rungs_are_guarded_individually() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "2").await;

    // Each rung is 2: every one hits the ceiling.
    interp
        .handle_line(&mut session, "split sell 6 into 3 from 100 to 110")
        .await;

    assert!(interp.exchange().calls().is_empty());
    assert_eq!(interp.reporter().errors().len(), 3);
}

#[tokio::test]
async fn test_split_continues_after_exchange_rejection() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "5").await;
    interp.exchange().set_failure(Some("Price too far"));

    interp
        .handle_line(&mut session, "split buy 3 into 3 from 1 to 3")
        .await;

    assert_eq!(interp.exchange().placed_orders().len(), 3);
    assert_eq!(interp.reporter().errors().len(), 3);
}

#[tokio::test]
async fn test_split_conditional_uses_inferred_side_and_limit() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "5").await;

    interp
        .handle_line(&mut session, "buy 1; split stop 3 into 3 from 90 to 80 @79")
        .await;

    let conditionals = interp.exchange().placed_conditionals();
    assert_eq!(conditionals.len(), 3);
    let triggers: Vec<Price> = conditionals
        .iter()
        .map(|c| c.trigger_price().unwrap())
        .collect();
    assert_eq!(
        triggers,
        vec![
            Price::new(dec!(80)),
            Price::new(dec!(85)),
            Price::new(dec!(90))
        ]
    );
    for c in &conditionals {
        assert_eq!(c.side(), OrderSide::Sell);
        assert_eq!(c.limit_price(), Some(Price::new(dec!(79))));
        assert_eq!(c.size(), Size::new(dec!(1)));
    }
}

#[tokio::test]
async fn test_malformed_split_places_nothing() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "5").await;

    interp
        .handle_line(&mut session, "split buy 10 into 5 from 100")
        .await;

    assert!(interp.exchange().calls().is_empty());
    let errors = interp.reporter().errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("malformed split command"));
}

#[tokio::test]
async fn test_cancel_scopes_reach_exchange() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "5").await;

    interp
        .handle_line(
            &mut session,
            "cancel; cancel limit; cancel conditional; cancel conditional 42; cancel 9596912",
        )
        .await;

    let scopes: Vec<CancelScope> = interp
        .exchange()
        .cancels()
        .into_iter()
        .map(|r| r.scope)
        .collect();
    assert_eq!(
        scopes,
        vec![
            CancelScope::All,
            CancelScope::LimitOnly,
            CancelScope::ConditionalOnly(None),
            CancelScope::ConditionalOnly(Some("42".to_string())),
            CancelScope::ById("9596912".to_string()),
        ]
    );
    assert_eq!(interp.reporter().successes().len(), 5);
}

#[tokio::test]
async fn test_cancel_without_market_issues_nothing() {
    let interp = interpreter();
    let mut session = Session::new();

    interp.handle_line(&mut session, "cancel").await;

    assert!(interp.exchange().calls().is_empty());
    assert_eq!(interp.reporter().errors().len(), 1);
}

fn position(future: &str, size: Decimal) -> PositionSummary {
    PositionSummary {
        future: future.to_string(),
        side: "buy".to_string(),
        size,
        net_size: Some(size),
        entry_price: Some(dec!(1.5)),
        estimated_liquidation_price: None,
        open_size: Some(size),
        realized_pnl: Some(dec!(0)),
        unrealized_pnl: Some(dec!(0.1)),
    }
}

#[tokio::test]
async fn test_positions_skip_flat_ones() {
    let interp = interpreter();
    interp.exchange().set_positions(vec![
        position("XTZ-PERP", dec!(3)),
        position("BTC-PERP", dec!(0)),
    ]);
    let mut session = Session::new();

    interp.handle_line(&mut session, "position").await;

    let out = interp.reporter().successes();
    assert_eq!(out.len(), 1);
    assert!(out[0].contains("market: XTZ-PERP"));
    assert_eq!(interp.exchange().calls(), vec![ExchangeCall::ListPositions]);
}

#[tokio::test]
async fn test_position_for_named_market() {
    let interp = interpreter();
    interp
        .exchange()
        .set_positions(vec![position("XTZ-PERP", dec!(3))]);
    let mut session = Session::new();

    interp
        .handle_line(&mut session, "position xtz-perp; position ETH-PERP")
        .await;

    assert_eq!(interp.reporter().successes().len(), 1);
    assert_eq!(
        interp.reporter().errors(),
        vec!["no position on ETH-PERP".to_string()]
    );
}

#[tokio::test]
async fn test_open_orders_listed() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "5").await;

    interp.handle_line(&mut session, "buy 1 @1.5").await;
    let placed = interp.exchange().placed_orders();
    let summary = ftxcmd_client::OrderSummary {
        id: 1,
        market: placed[0].market.to_string(),
        order_type: "limit".to_string(),
        side: "buy".to_string(),
        size: dec!(1),
        price: Some(dec!(1.5)),
        trigger_price: None,
        order_price: None,
        trail_value: None,
        order_type_on_trigger: None,
        reduce_only: false,
        status: Some("open".to_string()),
        client_id: None,
    };
    interp.exchange().set_open_orders(vec![summary]);
    interp.reporter().clear();

    interp.handle_line(&mut session, "order").await;

    let out = interp.reporter().successes();
    assert_eq!(out.len(), 1);
    assert!(out[0].starts_with("LIMIT order 1 - market: XTZ-PERP"));
    let market = MarketName::new("XTZ-PERP").unwrap();
    assert!(interp
        .exchange()
        .calls()
        .contains(&ExchangeCall::ListConditional(market)));
}

fn resting(id: u64, market: &str, order_type: &str) -> ftxcmd_client::OrderSummary {
    ftxcmd_client::OrderSummary {
        id,
        market: market.to_string(),
        order_type: order_type.to_string(),
        side: "sell".to_string(),
        size: dec!(1),
        price: None,
        trigger_price: None,
        order_price: None,
        trail_value: None,
        order_type_on_trigger: None,
        reduce_only: false,
        status: Some("open".to_string()),
        client_id: None,
    }
}

#[tokio::test]
async fn test_conditional_orders_listed_after_plain_ones() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "5").await;

    let mut limit = resting(10, "XTZ-PERP", "limit");
    limit.price = Some(dec!(1.6));
    let mut stop = resting(11, "XTZ-PERP", "stop");
    stop.trigger_price = Some(dec!(1.2));
    stop.order_price = Some(dec!(1.1));
    stop.reduce_only = true;
    let mut trail = resting(12, "XTZ-PERP", "trailing_stop");
    trail.trail_value = Some(dec!(-0.05));
    trail.reduce_only = true;
    let mut elsewhere = resting(13, "BTC-PERP", "take_profit");
    elsewhere.trigger_price = Some(dec!(30000));

    interp.exchange().set_open_orders(vec![limit]);
    interp
        .exchange()
        .set_conditional_orders(vec![stop, trail, elsewhere]);

    interp.handle_line(&mut session, "order").await;

    assert_eq!(
        interp.reporter().successes(),
        vec![
            "LIMIT order 10 - market: XTZ-PERP, size: 1, side: sell, price: 1.6 [open]".to_string(),
            "STOP order 11 - market: XTZ-PERP, size: 1, side: sell, triggerPrice: 1.2, limitPrice: 1.1, reduceOnly [open]".to_string(),
            "TRAILING_STOP order 12 - market: XTZ-PERP, size: 1, side: sell, trailValue: -0.05, reduceOnly [open]".to_string(),
        ]
    );
    assert!(interp.reporter().errors().is_empty());
}

#[tokio::test]
async fn test_only_conditional_orders_open() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "5").await;

    let mut stop = resting(21, "XTZ-PERP", "stop");
    stop.trigger_price = Some(dec!(0.9));
    interp.exchange().set_conditional_orders(vec![stop]);

    interp.handle_line(&mut session, "order; order BTC-PERP").await;

    let out = interp.reporter().successes();
    assert_eq!(out.len(), 2);
    assert!(out[0].starts_with("STOP order 21"));
    assert_eq!(out[1], "No orders available for BTC-PERP");
}

#[tokio::test]
async fn test_split_without_market_issues_nothing() {
    let interp = interpreter();
    let mut session = Session::new();

    interp
        .handle_line(&mut session, "fatfinger 5; split buy 10 into 5 from 100 to 110")
        .await;

    assert!(interp.exchange().calls().is_empty());
    assert_eq!(
        interp.reporter().errors(),
        vec!["no instrument selected, use: instrument MARKET".to_string()]
    );
}

#[tokio::test]
async fn test_single_rung_split_places_at_end() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "5").await;

    interp
        .handle_line(&mut session, "split sell 3 into 1 from 100 to 110")
        .await;

    let placed = interp.exchange().placed_orders();
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].price, Some(Price::new(dec!(110))));
    assert_eq!(placed[0].size, Size::new(dec!(3)));
    assert_eq!(placed[0].side, OrderSide::Sell);
}

#[tokio::test]
async fn test_split_with_unrepresentable_range_is_reported() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "5").await;

    interp
        .handle_line(
            &mut session,
            "split buy 1 into 2 from -79228162514264337593543950335 to 79228162514264337593543950335; buy 1",
        )
        .await;

    // The ladder fails alone; the next sub-command still runs.
    assert_eq!(interp.exchange().placed_orders().len(), 1);
    assert_eq!(interp.exchange().placed_orders()[0].kind(), OrderKind::Market);
    let errors = interp.reporter().errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("malformed command"));
}

#[tokio::test]
async fn test_huge_rung_count_is_rejected() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "5").await;

    interp
        .handle_line(&mut session, "split buy 1 into 4294967295 from 1 to 2")
        .await;

    assert!(interp.exchange().calls().is_empty());
    let errors = interp.reporter().errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("rung count"));
}

#[tokio::test]
async fn test_reports_follow_sub_command_order() {
    let interp = interpreter();
    let mut session = ready_session(&interp, "5").await;

    interp.handle_line(&mut session, "buy 1; sell; cancel").await;

    let reports = interp.reporter().reports();
    assert_eq!(reports.len(), 3);
    assert!(matches!(&reports[0], Report::Success(m) if m.starts_with("MARKET order")));
    assert_eq!(
        reports[1],
        Report::Error("malformed command: missing size".to_string())
    );
    assert_eq!(
        reports[2],
        Report::Success("Orders queued for cancelation".to_string())
    );
}
