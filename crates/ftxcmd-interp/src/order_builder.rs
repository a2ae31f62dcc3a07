//! `buy|sell SIZE [@PRICE]`.

use ftxcmd_core::{OrderIntent, OrderSide};

use crate::error::{CommandError, CommandResult};
use crate::session::Session;
use crate::tokenizer::{parse_price, parse_size};

/// Build a plain order from `[side, size, price?]`.
///
/// The side is written to `session.last_side` before anything else is
/// validated, so conditional side inference follows what the user typed
/// even when this order is rejected.
pub fn build_order(tokens: &[&str], session: &mut Session) -> CommandResult<OrderIntent> {
    let side: OrderSide = tokens
        .first()
        .copied()
        .unwrap_or_default()
        .parse()
        .map_err(|_| CommandError::malformed("expected buy or sell"))?;
    session.last_side = Some(side);

    if tokens.len() > 3 {
        return Err(CommandError::malformed(format!(
            "too many arguments, use: {side} SIZE [@PRICE]"
        )));
    }

    let size = parse_size(tokens.get(1).copied())?;
    let price = match tokens.get(2) {
        Some(token) => Some(
            parse_price(token, "price")?
                .ok_or_else(|| CommandError::malformed(format!("missing price after {token}")))?,
        ),
        None => None,
    };

    let market = session.require_market()?.clone();
    let intent = match price {
        Some(price) => OrderIntent::limit(market, side, size, price)?,
        None => OrderIntent::market(market, side, size)?,
    };
    Ok(intent)
}
