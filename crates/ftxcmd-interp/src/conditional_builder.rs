//! `stop|tp|trail SIZE TRIGGER [SIDE] [LIMIT]`.
//!
//! The side of a conditional order is usually implied: a stop or take-profit
//! closes the position the last buy/sell opened, so it takes the opposite
//! side. An explicit side is only consulted when inference does not apply.

use ftxcmd_core::{
    ConditionalFamily, ConditionalIntent, MarketName, OrderSide, Price, Size, Trigger,
};
use rust_decimal::Decimal;

use crate::error::{CommandError, CommandResult};
use crate::session::Session;
use crate::tokenizer::{parse_decimal, parse_price, parse_size};

/// Build a conditional order from `[family, size, trigger?, side?, limit?]`.
pub fn build_conditional(tokens: &[&str], session: &Session) -> CommandResult<ConditionalIntent> {
    let verb = tokens.first().copied().unwrap_or_default();
    let family = ConditionalFamily::from_verb(verb)
        .ok_or_else(|| CommandError::malformed(format!("not a conditional order: {verb}")))?;

    if tokens.len() > 5 {
        return Err(CommandError::malformed(format!(
            "too many arguments, use: {verb} SIZE TRIGGER [SIDE] [LIMIT]"
        )));
    }

    let size = parse_size(tokens.get(1).copied())?;

    let trigger_value = match tokens.get(2) {
        Some(token) => parse_decimal(token, "trigger")?,
        None => None,
    };
    let trigger_value = trigger_value.ok_or_else(|| {
        if family.is_trailing() {
            CommandError::malformed("missing trail value")
        } else {
            CommandError::malformed("missing trigger price")
        }
    })?;

    let limit_price = match tokens.get(4) {
        Some(token) => parse_price(token, "limit price")?,
        None => None,
    };

    let side = resolve_side(session, tokens.get(3).copied(), limit_price.is_some())?;
    let market = session.require_market()?.clone();

    conditional_intent(market, family, side, size, trigger_value, limit_price)
}

/// Side resolution, first match wins:
/// 1. last buy/sell known and no limit price: the opposite side
/// 2. explicit side token
/// 3. `MissingSide`
pub(crate) fn resolve_side(
    session: &Session,
    explicit: Option<&str>,
    has_limit: bool,
) -> CommandResult<OrderSide> {
    if let (Some(last), false) = (session.last_side, has_limit) {
        return Ok(last.opposite());
    }
    match explicit {
        Some(token) => token
            .parse()
            .map_err(|_| CommandError::malformed(format!("side must be buy or sell: {token}"))),
        None => Err(CommandError::MissingSide),
    }
}

/// Trailing stops read `value` as the trail distance, every other family as
/// the trigger price.
pub(crate) fn conditional_intent(
    market: MarketName,
    family: ConditionalFamily,
    side: OrderSide,
    size: Size,
    value: Decimal,
    limit_price: Option<Price>,
) -> CommandResult<ConditionalIntent> {
    let trigger = if family.is_trailing() {
        Trigger::Trail(value)
    } else {
        Trigger::Price(Price::new(value))
    };
    Ok(ConditionalIntent::new(
        market,
        family,
        side,
        size,
        trigger,
        limit_price,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn session(last_side: Option<OrderSide>) -> Session {
        let mut session = Session::new().with_market(MarketName::new("XTZ-PERP").unwrap());
        session.last_side = last_side;
        session
    }

    #[test]
    fn test_take_profit_after_buy_sells() {
        let intent = build_conditional(&["tp", "1", "@50"], &session(Some(OrderSide::Buy))).unwrap();
        assert_eq!(intent.family(), ConditionalFamily::TakeProfit);
        assert_eq!(intent.side(), OrderSide::Sell);
        assert_eq!(intent.trigger_price(), Some(Price::new(dec!(50))));
        assert_eq!(intent.limit_price(), None);
    }

    #[test]
    fn test_stop_after_sell_buys() {
        let intent = build_conditional(&["stop", "1", "60"], &session(Some(OrderSide::Sell))).unwrap();
        assert_eq!(intent.family(), ConditionalFamily::Stop);
        assert_eq!(intent.side(), OrderSide::Buy);
    }

    #[test]
    fn test_inference_beats_explicit_side_without_limit() {
        let intent =
            build_conditional(&["stop", "1", "60", "sell"], &session(Some(OrderSide::Sell))).unwrap();
        assert_eq!(intent.side(), OrderSide::Buy);
    }

    #[test]
    fn test_limit_price_switches_to_explicit_side() {
        let intent = build_conditional(
            &["tp", "1", "@50", "sell", "@49.5"],
            &session(Some(OrderSide::Sell)),
        )
        .unwrap();
        assert_eq!(intent.side(), OrderSide::Sell);
        assert_eq!(intent.limit_price(), Some(Price::new(dec!(49.5))));
    }

    #[test]
    fn test_bare_sigil_limit_counts_as_absent() {
        let intent =
            build_conditional(&["tp", "1", "@1", "sell", "@"], &session(Some(OrderSide::Sell))).unwrap();
        assert_eq!(intent.limit_price(), None);
        // No limit, so inference applies.
        assert_eq!(intent.side(), OrderSide::Buy);

        let intent = build_conditional(&["tp", "1", "@1", "sell", "@"], &session(None)).unwrap();
        assert_eq!(intent.side(), OrderSide::Sell);
    }

    #[test]
    fn test_missing_side() {
        let err = build_conditional(&["tp", "1", "@50"], &session(None)).unwrap_err();
        assert!(matches!(err, CommandError::MissingSide));

        let err = build_conditional(&["tp", "1", "@50", "hold"], &session(None)).unwrap_err();
        assert!(matches!(err, CommandError::MalformedCommand(_)));
    }

    #[test]
    fn test_trigger_required() {
        let err = build_conditional(&["stop", "1"], &session(Some(OrderSide::Buy))).unwrap_err();
        assert_eq!(err.to_string(), "malformed command: missing trigger price");

        let err = build_conditional(&["trail", "1"], &session(Some(OrderSide::Buy))).unwrap_err();
        assert_eq!(err.to_string(), "malformed command: missing trail value");
    }

    #[test]
    fn test_trail_takes_negative_value() {
        let intent =
            build_conditional(&["trail", "1", "-0.05"], &session(Some(OrderSide::Buy))).unwrap();
        assert_eq!(intent.family(), ConditionalFamily::TrailingStop);
        assert_eq!(intent.trail_value(), Some(dec!(-0.05)));
        assert_eq!(intent.trigger_price(), None);
        assert_eq!(intent.side(), OrderSide::Sell);
    }

    #[test]
    fn test_zero_trail_is_rejected() {
        let err = build_conditional(&["trail", "1", "0"], &session(Some(OrderSide::Buy))).unwrap_err();
        assert!(matches!(err, CommandError::MalformedCommand(_)));
    }

    #[test]
    fn test_missing_market() {
        let mut session = Session::new();
        session.last_side = Some(OrderSide::Buy);
        let err = build_conditional(&["tp", "1", "@50"], &session).unwrap_err();
        assert!(matches!(err, CommandError::MissingMarket));
    }
}
