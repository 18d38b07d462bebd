//! Backtest simulator: replays previous-day signals against a ledger.
//!
//! Per simulated day, in order: sell check, then either the initial buy or
//! one additional buy (dip first, golden cross second), then the day's value
//! is recorded. Warm-up days are skipped entirely.

use tracing::debug;

use crate::domain::backtest_signal::{DaySignal, MIN_BARS_TRADABLE, previous_day_signals};
use crate::domain::error::TrendSignalError;
use crate::domain::indicator_engine::compute_snapshots;
use crate::domain::ledger::{EquityPoint, Ledger, TradeKind};
use crate::domain::metrics::Metrics;
use crate::domain::price_series::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Per-purchase budget, and the cash needed before any purchase.
    pub lot_size: f64,
    /// Fractional drop below average cost that triggers a dip buy.
    pub dip_threshold: f64,
    /// Bars of history requested from the data source.
    pub lookback: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 5000.0,
            lot_size: 1000.0,
            dip_threshold: 0.05,
            lookback: 252,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub ticker: String,
    pub initial_capital: f64,
    pub daily_values: Vec<EquityPoint>,
    pub final_value: f64,
    pub net_profit: f64,
    /// Net profit as a percentage of initial capital.
    pub return_pct: f64,
    pub ledger: Ledger,
    pub metrics: Metrics,
}

/// Computes indicators and previous-day signals, then simulates.
pub fn run_backtest(
    series: &PriceSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, TrendSignalError> {
    series.require_data()?;
    let snapshots = compute_snapshots(series);
    let signals = previous_day_signals(&snapshots);
    simulate(series, &signals, config)
}

/// Replays `signals` (one per bar, `None` = not tradable) over `series`.
pub fn simulate(
    series: &PriceSeries,
    signals: &[Option<DaySignal>],
    config: &BacktestConfig,
) -> Result<BacktestResult, TrendSignalError> {
    series.require_data()?;

    let mut ledger = Ledger::new(config.initial_capital);
    let mut daily_values = Vec::new();

    for (i, bar) in series.bars().iter().enumerate() {
        let Some(signal) = signals.get(i).copied().flatten() else {
            continue;
        };
        let close = bar.close;

        if !ledger.is_flat() && signal.sell {
            if let Some(shares) = ledger.sell_all(bar.date, close) {
                debug!(date = %bar.date, shares, price = close, "sell");
            }
        }

        if ledger.is_flat() && signal.buy && ledger.can_afford(config.lot_size) {
            if let Some(shares) =
                ledger.buy_lot(bar.date, close, config.lot_size, TradeKind::InitialBuy)
            {
                debug!(date = %bar.date, shares, price = close, "initial buy");
            }
        } else if !ledger.is_flat() && ledger.can_afford(config.lot_size) {
            let mut bought_today = false;

            let dip = ledger
                .drop_from_cost(close)
                .is_some_and(|drop| drop >= config.dip_threshold);
            if dip && close > signal.ma_25 {
                if let Some(shares) =
                    ledger.buy_lot(bar.date, close, config.lot_size, TradeKind::DipBuy)
                {
                    debug!(date = %bar.date, shares, price = close, "dip buy");
                    bought_today = true;
                }
            }

            if !bought_today && signal.golden_cross && close > signal.ma_25 {
                if let Some(shares) =
                    ledger.buy_lot(bar.date, close, config.lot_size, TradeKind::GoldenCrossBuy)
                {
                    debug!(date = %bar.date, shares, price = close, "golden cross buy");
                }
            }
        }

        daily_values.push(EquityPoint {
            date: bar.date,
            value: ledger.value(close),
        });
    }

    if daily_values.is_empty() {
        return Err(TrendSignalError::InsufficientData {
            ticker: series.ticker().to_string(),
            bars: series.len(),
            minimum: MIN_BARS_TRADABLE,
        });
    }

    let last_close = series.last().map(|b| b.close).unwrap_or(0.0);
    let final_value = ledger.value(last_close);
    let net_profit = final_value - config.initial_capital;
    let return_pct = if config.initial_capital > 0.0 {
        net_profit / config.initial_capital * 100.0
    } else {
        0.0
    };
    let metrics = Metrics::compute(&daily_values, &ledger);

    Ok(BacktestResult {
        ticker: series.ticker().to_string(),
        initial_capital: config.initial_capital,
        daily_values,
        final_value,
        net_profit,
        return_pct,
        ledger,
        metrics,
    })
}
