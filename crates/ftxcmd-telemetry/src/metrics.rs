//! Prometheus counters for ftxcmd sessions.
//!
//! Covers:
//! - Commands dispatched, by verb
//! - Orders submitted and failed, by kind
//! - Fat-finger rejections, by reason
//! - Command errors, by error kind
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. A registration failure
//! means duplicate metric names, which is a programming error that should
//! crash at first use rather than silently drop counts.

use once_cell::sync::Lazy;
use prometheus::core::Collector;
use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, HistogramVec};
use std::fmt;

/// Sub-commands dispatched.
/// Labels: verb (buy/sell/stop/tp/trail/split/cancel/instrument/...)
pub static COMMANDS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ftxcmd_commands_total",
        "Total sub-commands dispatched",
        &["verb"]
    )
    .unwrap()
});

/// Orders accepted by the exchange.
/// Labels: kind (market/limit/stop/takeProfit/trailingStop)
pub static ORDERS_SUBMITTED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ftxcmd_orders_submitted_total",
        "Total orders accepted by the exchange",
        &["kind"]
    )
    .unwrap()
});

/// Orders the exchange rejected or that failed in transport.
pub static ORDERS_FAILED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ftxcmd_orders_failed_total",
        "Total order submissions that failed",
        &["kind"]
    )
    .unwrap()
});

/// Orders stopped by the fat-finger guard.
/// Labels: reason (not_configured/exceeded)
pub static FATFINGER_BLOCKED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ftxcmd_fatfinger_blocked_total",
        "Total orders blocked by the fat-finger guard",
        &["reason"]
    )
    .unwrap()
});

/// Reported command errors.
pub static COMMAND_ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ftxcmd_command_errors_total",
        "Total command errors reported to the user",
        &["error"]
    )
    .unwrap()
});

/// Exchange round-trip latency in milliseconds.
pub static EXCHANGE_LATENCY_MS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "ftxcmd_exchange_latency_ms",
        "Exchange request latency in milliseconds",
        &["operation"],
        vec![25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]
    )
    .unwrap()
});

/// Metrics helper functions.
pub struct Metrics;

impl Metrics {
    /// Record a dispatched sub-command.
    pub fn command(verb: &str) {
        COMMANDS_TOTAL.with_label_values(&[verb]).inc();
    }

    /// Record an order accepted by the exchange.
    pub fn order_submitted(kind: &str) {
        ORDERS_SUBMITTED_TOTAL.with_label_values(&[kind]).inc();
    }

    /// Record a failed order submission.
    pub fn order_failed(kind: &str) {
        ORDERS_FAILED_TOTAL.with_label_values(&[kind]).inc();
    }

    /// Record a fat-finger rejection.
    pub fn fatfinger_blocked(reason: &str) {
        FATFINGER_BLOCKED_TOTAL.with_label_values(&[reason]).inc();
    }

    /// Record a reported command error.
    pub fn command_error(error: &str) {
        COMMAND_ERRORS_TOTAL.with_label_values(&[error]).inc();
    }

    /// Record exchange call latency.
    pub fn exchange_latency(operation: &str, latency_ms: f64) {
        EXCHANGE_LATENCY_MS
            .with_label_values(&[operation])
            .observe(latency_ms);
    }

    /// Totals across all labels, for the `stats` command.
    pub fn snapshot() -> MetricsSnapshot {
        let (exchange_calls, latency_sum) = EXCHANGE_LATENCY_MS
            .collect()
            .iter()
            .flat_map(|family| family.get_metric())
            .map(|m| m.get_histogram())
            .fold((0u64, 0f64), |(count, sum), h| {
                (count + h.get_sample_count(), sum + h.get_sample_sum())
            });
        let exchange_latency_ms = if exchange_calls == 0 {
            0
        } else {
            (latency_sum / exchange_calls as f64).round() as u64
        };

        MetricsSnapshot {
            commands: total(&COMMANDS_TOTAL),
            orders_submitted: total(&ORDERS_SUBMITTED_TOTAL),
            orders_failed: total(&ORDERS_FAILED_TOTAL),
            fatfinger_blocked: total(&FATFINGER_BLOCKED_TOTAL),
            command_errors: total(&COMMAND_ERRORS_TOTAL),
            exchange_calls,
            exchange_latency_ms,
        }
    }
}

fn total(counter: &CounterVec) -> u64 {
    let sum: f64 = counter
        .collect()
        .iter()
        .flat_map(|family| family.get_metric())
        .map(|m| m.get_counter().get_value())
        .sum();
    sum as u64
}

/// Process-wide counter totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub commands: u64,
    pub orders_submitted: u64,
    pub orders_failed: u64,
    pub fatfinger_blocked: u64,
    pub command_errors: u64,
    pub exchange_calls: u64,
    /// Mean exchange round trip, rounded to whole milliseconds.
    pub exchange_latency_ms: u64,
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "commands: {}, orders submitted: {}, orders failed: {}, fatfinger blocks: {}, errors: {}, exchange calls: {} (avg {} ms)",
            self.commands,
            self.orders_submitted,
            self.orders_failed,
            self.fatfinger_blocked,
            self.command_errors,
            self.exchange_calls,
            self.exchange_latency_ms
        )
    }
}
