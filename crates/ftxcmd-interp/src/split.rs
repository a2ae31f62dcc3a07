//! `split SIDE SIZE into TOTAL from START to END [LIMIT]`.
//!
//! Divides SIZE evenly over TOTAL price rungs from START to END inclusive.
//! For buy/sell every rung is a limit order at the rung price; for
//! stop/tp/trail every rung is a conditional order triggered at the rung
//! (the trail distance, for trailing stops) with the same optional limit.

use ftxcmd_core::{
    ConditionalFamily, ConditionalIntent, MarketName, OrderIntent, OrderSide, Price, Size,
};
use rust_decimal::Decimal;

use crate::conditional_builder::{conditional_intent, resolve_side};
use crate::error::{CommandError, CommandResult};
use crate::session::Session;
use crate::tokenizer::{parse_decimal, parse_price};

const USAGE: &str = "use: split SIDE SIZE into TOTAL from START to END [LIMIT]";

/// What each rung becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKind {
    Order(OrderSide),
    Conditional(ConditionalFamily),
}

/// Parsed split command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub kind: SplitKind,
    /// Size of every rung (total size / rung count).
    pub rung_size: Size,
    /// Rung prices, start to end.
    pub ladder: Vec<Decimal>,
    /// Limit price applied to every conditional rung.
    pub limit_price: Option<Price>,
}

/// One rung ready for the guard and the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RungIntent {
    Order(OrderIntent),
    Conditional(ConditionalIntent),
}

impl RungIntent {
    pub fn size(&self) -> Size {
        match self {
            Self::Order(intent) => intent.size,
            Self::Conditional(intent) => intent.size(),
        }
    }
}

/// Most rungs a single split may place.
pub const MAX_RUNGS: u32 = 100;

/// `total` evenly spaced values from `start` to `end`, both included.
///
/// A single rung sits at `end`. Returns `None` when the spacing does not fit
/// in a `Decimal`.
pub fn plan_ladder(start: Decimal, end: Decimal, total: u32) -> Option<Vec<Decimal>> {
    match total {
        0 => Some(Vec::new()),
        1 => Some(vec![end]),
        _ => {
            let step = end
                .checked_sub(start)?
                .checked_div(Decimal::from(total - 1))?;
            let mut ladder = Vec::with_capacity(total as usize);
            for i in 0..total - 1 {
                ladder.push(start.checked_add(step.checked_mul(Decimal::from(i))?)?);
            }
            ladder.push(end);
            Some(ladder)
        }
    }
}

fn keyword(tokens: &[&str], index: usize, expected: &str) -> CommandResult<()> {
    if tokens.get(index).copied() == Some(expected) {
        Ok(())
    } else {
        Err(CommandError::malformed(format!(
            "expected '{expected}' in split command, {USAGE}"
        )))
    }
}

fn bound(token: &str, what: &str) -> CommandResult<Decimal> {
    parse_decimal(token, what)?
        .ok_or_else(|| CommandError::malformed(format!("missing {what}, {USAGE}")))
}

/// Parse the split grammar. Nothing is placed when this fails.
pub fn parse_split(tokens: &[&str]) -> CommandResult<SplitPlan> {
    if tokens.len() < 9 {
        return Err(CommandError::malformed(format!(
            "malformed split command, {USAGE}"
        )));
    }
    if tokens.len() > 10 {
        return Err(CommandError::malformed(format!(
            "too many arguments, {USAGE}"
        )));
    }

    let kind = match tokens[1] {
        verb @ ("buy" | "sell") => SplitKind::Order(verb.parse()?),
        verb => SplitKind::Conditional(ConditionalFamily::from_verb(verb).ok_or_else(|| {
            CommandError::malformed(format!("cannot split {verb}, {USAGE}"))
        })?),
    };

    let size: Size = tokens[2]
        .parse()
        .ok()
        .filter(Size::is_positive)
        .ok_or_else(|| CommandError::malformed("missing size"))?;

    keyword(tokens, 3, "into")?;
    let total: u32 = tokens[4]
        .parse()
        .ok()
        .filter(|n| (1..=MAX_RUNGS).contains(n))
        .ok_or_else(|| {
            CommandError::malformed(format!(
                "rung count must be a whole number from 1 to {MAX_RUNGS}: {}",
                tokens[4]
            ))
        })?;
    keyword(tokens, 5, "from")?;
    let start = bound(tokens[6], "start")?;
    keyword(tokens, 7, "to")?;
    let end = bound(tokens[8], "end")?;

    let limit_price = match tokens.get(9) {
        Some(token) => parse_price(token, "limit price")?,
        None => None,
    };
    if limit_price.is_some() && matches!(kind, SplitKind::Order(_)) {
        return Err(CommandError::malformed(format!(
            "limit price only applies to conditional splits, {USAGE}"
        )));
    }

    let rung_size = size
        .split_even(total)
        .ok_or_else(|| CommandError::malformed("rung count must be at least 1"))?;
    let ladder = plan_ladder(start, end, total).ok_or_else(|| {
        CommandError::malformed(format!("price range {start} to {end} is too wide to split"))
    })?;

    Ok(SplitPlan {
        kind,
        rung_size,
        ladder,
        limit_price,
    })
}

impl SplitPlan {
    /// Rung prices in placement order: end first.
    pub fn placement_order(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.ladder.iter().rev().copied()
    }

    /// Side used for conditional rungs: opposite of the last buy/sell.
    pub fn conditional_side(&self, session: &Session) -> CommandResult<Option<OrderSide>> {
        match self.kind {
            SplitKind::Order(_) => Ok(None),
            SplitKind::Conditional(_) => resolve_side(session, None, false).map(Some),
        }
    }

    /// Build the intent for one rung.
    pub fn rung_intent(
        &self,
        market: &MarketName,
        conditional_side: Option<OrderSide>,
        rung: Decimal,
    ) -> CommandResult<RungIntent> {
        match self.kind {
            SplitKind::Order(side) => Ok(RungIntent::Order(OrderIntent::limit(
                market.clone(),
                side,
                self.rung_size,
                Price::new(rung),
            )?)),
            SplitKind::Conditional(family) => {
                let side = conditional_side.ok_or(CommandError::MissingSide)?;
                Ok(RungIntent::Conditional(conditional_intent(
                    market.clone(),
                    family,
                    side,
                    self.rung_size,
                    rung,
                    self.limit_price,
                )?))
            }
        }
    }
}
