//! Command dispatch.
//!
//! [`Interpreter::handle_line`] is the single entry point. It runs every
//! `;`-separated sub-command of a line in order, awaiting each exchange call
//! before the next, and turns every failure into a [`Reporter::error`] call so
//! one bad sub-command never stops the rest of the line.

use std::time::Instant;

use ftxcmd_client::Exchange;
use ftxcmd_core::{ConditionalIntent, MarketName, OrderIntent, Size};
use ftxcmd_risk::{FatFingerCeiling, FatFingerGuard, FatFingerRejection};
use ftxcmd_telemetry::Metrics;
use tracing::{debug, info, warn};

use crate::cancel::build_cancel;
use crate::conditional_builder::build_conditional;
use crate::error::{CommandError, CommandResult};
use crate::order_builder::build_order;
use crate::reporter::Reporter;
use crate::session::Session;
use crate::split::{parse_split, RungIntent};
use crate::tokenizer::{split_commands, tokens};

/// Command reference printed by `help`.
pub const HELP: &str = "\
Commands (separate several with ';'):
  instrument [MARKET]                          show or select the market
  fatfinger [SIZE]                             show or set the maximum order size
  buy|sell SIZE [@PRICE]                       market order, or limit order at PRICE
  stop|tp SIZE @TRIGGER [SIDE] [@LIMIT]        stop / take-profit order
  trail SIZE VALUE [SIDE] [@LIMIT]             trailing stop with trail VALUE
  split SIDE SIZE into N from START to END [@LIMIT]
                                               N orders evenly spaced from START to END
  cancel [limit | conditional [ID] | ID]       cancel orders on the market
  order [MARKET]                               list open orders
  position [MARKET]                            show positions
  stats                                        session counters
  help                                         this text
  q                                            quit";

/// Interprets command lines against an exchange.
pub struct Interpreter<E, R> {
    exchange: E,
    reporter: R,
}

impl<E: Exchange, R: Reporter> Interpreter<E, R> {
    pub fn new(exchange: E, reporter: R) -> Self {
        Self { exchange, reporter }
    }

    pub fn exchange(&self) -> &E {
        &self.exchange
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Run every sub-command of `raw`, left to right. Never fails: errors
    /// are reported and the next sub-command still runs.
    pub async fn handle_line(&self, session: &mut Session, raw: &str) {
        for command in split_commands(raw) {
            if let Err(e) = self.handle_command(session, command).await {
                self.report_error(&e);
            }
        }
    }

    fn report_error(&self, error: &CommandError) {
        Metrics::command_error(error.kind());
        debug!(error = %error, kind = error.kind(), "Command failed");
        self.reporter.error(&error.to_string());
    }

    async fn handle_command(&self, session: &mut Session, command: &str) -> CommandResult<()> {
        let tokens = tokens(command);
        let verb = tokens.first().copied().unwrap_or_default();
        if verb.is_empty() {
            return Err(CommandError::malformed("empty command"));
        }

        debug!(command, "Dispatching command");

        match verb {
            "buy" | "sell" => {
                Metrics::command(verb);
                let intent = build_order(&tokens, session)?;
                self.submit_order(session.ceiling, intent).await
            }
            "stop" | "tp" | "trail" => {
                Metrics::command(verb);
                let intent = build_conditional(&tokens, session)?;
                self.submit_conditional(session.ceiling, intent).await
            }
            "split" => {
                Metrics::command(verb);
                self.split(session, &tokens).await
            }
            "cancel" => {
                Metrics::command(verb);
                let request = build_cancel(&tokens, session)?;
                info!(request = %request, "Cancelling orders");
                let started = Instant::now();
                let result = self.exchange.cancel_orders(request).await;
                Metrics::exchange_latency("cancel_orders", elapsed_ms(started));
                self.reporter.success(&result?.to_string());
                Ok(())
            }
            "instrument" => {
                Metrics::command(verb);
                self.instrument(session, &tokens)
            }
            "fatfinger" => {
                Metrics::command(verb);
                self.fatfinger(session, &tokens)
            }
            "order" => {
                Metrics::command(verb);
                let market = market_arg(session, &tokens, "order")?;
                self.list_orders(market).await
            }
            "position" => {
                Metrics::command(verb);
                self.positions(&tokens).await
            }
            "help" | "/help" => {
                Metrics::command("help");
                self.reporter.success(HELP);
                Ok(())
            }
            "stats" => {
                Metrics::command(verb);
                self.reporter.success(&Metrics::snapshot().to_string());
                Ok(())
            }
            _ => {
                Metrics::command("unknown");
                Err(CommandError::UnknownCommand(verb.to_string()))
            }
        }
    }

    fn instrument(&self, session: &mut Session, tokens: &[&str]) -> CommandResult<()> {
        match tokens {
            [_] => {
                let market = session.require_market()?;
                self.reporter.success(&format!("instrument: {market}"));
            }
            [_, name] => {
                let market = MarketName::new(name)?;
                info!(market = %market, "Instrument selected");
                self.reporter.success(&format!("instrument set to {market}"));
                session.market = Some(market);
            }
            _ => return Err(CommandError::malformed("use: instrument [MARKET]")),
        }
        Ok(())
    }

    fn fatfinger(&self, session: &mut Session, tokens: &[&str]) -> CommandResult<()> {
        match tokens {
            [_] => {
                let ceiling = session.ceiling.ok_or(FatFingerRejection::NotConfigured)?;
                self.reporter.success(&format!("fatfinger: {ceiling}"));
            }
            [_, value] => {
                let ceiling: FatFingerCeiling = value
                    .parse()
                    .map_err(|e: ftxcmd_risk::RiskError| CommandError::malformed(e.to_string()))?;
                info!(ceiling = %ceiling, "Fat-finger ceiling set");
                self.reporter.success(&format!("fatfinger set to {ceiling}"));
                session.ceiling = Some(ceiling);
            }
            _ => return Err(CommandError::malformed("use: fatfinger [SIZE]")),
        }
        Ok(())
    }

    /// Fat-finger check, run right before every placement.
    fn guard(&self, size: Size, ceiling: Option<FatFingerCeiling>) -> CommandResult<()> {
        FatFingerGuard::check(size, ceiling).map_err(|rejection| {
            let reason = match rejection {
                FatFingerRejection::NotConfigured => "not_configured",
                FatFingerRejection::Exceeded { .. } => "exceeded",
            };
            Metrics::fatfinger_blocked(reason);
            CommandError::from(rejection)
        })
    }

    async fn submit_order(
        &self,
        ceiling: Option<FatFingerCeiling>,
        intent: OrderIntent,
    ) -> CommandResult<()> {
        self.guard(intent.size, ceiling)?;

        let kind = intent.kind().as_str();
        info!(order = %intent, client_id = %intent.client_id, "Placing order");
        let started = Instant::now();
        let result = self.exchange.place_order(intent).await;
        Metrics::exchange_latency("place_order", elapsed_ms(started));

        match result {
            Ok(order) => {
                Metrics::order_submitted(kind);
                self.reporter.success(&order.to_string());
                Ok(())
            }
            Err(e) => {
                Metrics::order_failed(kind);
                warn!(error = %e, "Order placement failed");
                Err(e.into())
            }
        }
    }

    async fn submit_conditional(
        &self,
        ceiling: Option<FatFingerCeiling>,
        intent: ConditionalIntent,
    ) -> CommandResult<()> {
        self.guard(intent.size(), ceiling)?;

        let kind = intent.family().as_str();
        info!(order = %intent, client_id = %intent.client_id(), "Placing conditional order");
        let started = Instant::now();
        let result = self.exchange.place_conditional_order(intent).await;
        Metrics::exchange_latency("place_conditional_order", elapsed_ms(started));

        match result {
            Ok(order) => {
                Metrics::order_submitted(kind);
                self.reporter.success(&order.to_string());
                Ok(())
            }
            Err(e) => {
                Metrics::order_failed(kind);
                warn!(error = %e, "Conditional order placement failed");
                Err(e.into())
            }
        }
    }

    /// Place every rung, end price first. A failed rung is reported on its
    /// own; rungs already placed stay placed and later rungs still run.
    async fn split(&self, session: &Session, tokens: &[&str]) -> CommandResult<()> {
        let plan = parse_split(tokens)?;
        let market = session.require_market()?;
        let side = plan.conditional_side(session)?;

        info!(
            market = %market,
            rungs = plan.ladder.len(),
            rung_size = %plan.rung_size,
            "Placing split order"
        );

        for rung in plan.placement_order() {
            let placed = match plan.rung_intent(market, side, rung) {
                Ok(RungIntent::Order(intent)) => self.submit_order(session.ceiling, intent).await,
                Ok(RungIntent::Conditional(intent)) => {
                    self.submit_conditional(session.ceiling, intent).await
                }
                Err(e) => Err(e),
            };
            if let Err(e) = placed {
                self.report_error(&e);
            }
        }
        Ok(())
    }

    async fn list_orders(&self, market: MarketName) -> CommandResult<()> {
        let started = Instant::now();
        let orders = self.exchange.list_open_orders(market.clone()).await;
        Metrics::exchange_latency("list_open_orders", elapsed_ms(started));
        let orders = orders?;

        let started = Instant::now();
        let conditional = self
            .exchange
            .list_open_conditional_orders(market.clone())
            .await;
        Metrics::exchange_latency("list_open_conditional_orders", elapsed_ms(started));
        let conditional = conditional?;

        if orders.is_empty() && conditional.is_empty() {
            self.reporter
                .success(&format!("No orders available for {market}"));
            return Ok(());
        }
        for order in orders.iter().chain(conditional.iter()) {
            self.reporter.success(&order.to_string());
        }
        Ok(())
    }

    async fn positions(&self, tokens: &[&str]) -> CommandResult<()> {
        let wanted = match tokens {
            [_] => None,
            [_, name] => Some(MarketName::new(name)?),
            _ => return Err(CommandError::malformed("use: position [MARKET]")),
        };

        let started = Instant::now();
        let positions = self.exchange.list_positions().await;
        Metrics::exchange_latency("list_positions", elapsed_ms(started));
        let positions = positions?;
        match wanted {
            Some(market) => {
                let position = positions
                    .iter()
                    .find(|p| p.future == market.as_str())
                    .ok_or_else(|| CommandError::NoPosition(market.to_string()))?;
                self.reporter.success(&position.to_string());
            }
            None => {
                let open: Vec<_> = positions.iter().filter(|p| p.is_open()).collect();
                if open.is_empty() {
                    self.reporter.success("No open positions");
                }
                for position in open {
                    self.reporter.success(&position.to_string());
                }
            }
        }
        Ok(())
    }
}

/// Market from the second token, else the session's market.
fn market_arg(session: &Session, tokens: &[&str], verb: &str) -> CommandResult<MarketName> {
    match tokens {
        [_] => Ok(session.require_market()?.clone()),
        [_, name] => Ok(MarketName::new(name)?),
        _ => Err(CommandError::malformed(format!("use: {verb} [MARKET]"))),
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
