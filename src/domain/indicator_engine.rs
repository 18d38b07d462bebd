//! Indicator engine: runs every indicator pass over a series and zips the
//! results into one snapshot per bar.

use crate::domain::indicator::bollinger::{DEFAULT_MULT_X100, DEFAULT_PERIOD, calculate_bollinger};
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::fibonacci::calculate_fibonacci;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SLOW, calculate_macd_default};
use crate::domain::indicator::obv::calculate_obv;
use crate::domain::indicator::rolling_max::{
    RECENT_HIGH_PERIOD, calculate_rolling_max, drawdown_from_high,
};
use crate::domain::indicator::rsi::{self, calculate_rsi};
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::{IndicatorSeries, IndicatorValue};
use crate::domain::price_series::PriceSeries;
use crate::domain::snapshot::IndicatorSnapshot;

pub const MA_SHORT: usize = 5;
pub const MA_MID: usize = 25;
pub const MA_LONG: usize = 99;

/// One snapshot per bar, in series order. Pure: identical input yields
/// identical output.
pub fn compute_snapshots(series: &PriceSeries) -> Vec<IndicatorSnapshot> {
    let bars = series.bars();
    if bars.is_empty() {
        return Vec::new();
    }

    let ma_5 = calculate_sma(bars, MA_SHORT).simple_values();
    let ma_25 = calculate_sma(bars, MA_MID).simple_values();
    let ma_99 = calculate_sma(bars, MA_LONG).simple_values();
    let rsi_14 = calculate_rsi(bars, rsi::DEFAULT_PERIOD).simple_values();
    let ema_12 = calculate_ema(bars, DEFAULT_FAST).simple_values();
    let ema_26 = calculate_ema(bars, DEFAULT_SLOW).simple_values();
    let obv = calculate_obv(bars).simple_values();
    let recent_high = calculate_rolling_max(bars, RECENT_HIGH_PERIOD).simple_values();
    let macd = calculate_macd_default(bars);
    let bollinger = calculate_bollinger(bars, DEFAULT_PERIOD, DEFAULT_MULT_X100);

    let mut snapshots: Vec<IndicatorSnapshot> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let (macd_line, macd_signal) = macd_parts(&macd, i);
            let (bb_upper, bb_middle, bb_lower) = bollinger_parts(&bollinger, i);
            IndicatorSnapshot {
                date: bar.date,
                close: bar.close,
                ma_5: ma_5[i],
                ma_20: bb_middle,
                ma_25: ma_25[i],
                ma_99: ma_99[i],
                rsi_14: rsi_14[i],
                ema_12: ema_12[i],
                ema_26: ema_26[i],
                macd: macd_line,
                macd_signal,
                bb_upper,
                bb_middle,
                bb_lower,
                obv: obv[i],
                recent_high: recent_high[i],
                price_drop: recent_high[i].and_then(|high| drawdown_from_high(high, bar.close)),
                fibonacci: None,
            }
        })
        .collect();

    if let Some(last) = snapshots.last_mut() {
        last.fibonacci = calculate_fibonacci(bars);
    }

    snapshots
}

fn macd_parts(series: &IndicatorSeries, i: usize) -> (Option<f64>, Option<f64>) {
    match series.values.get(i).and_then(|p| p.value) {
        Some(IndicatorValue::Macd { line, signal, .. }) => (Some(line), Some(signal)),
        _ => (None, None),
    }
}

fn bollinger_parts(series: &IndicatorSeries, i: usize) -> (Option<f64>, Option<f64>, Option<f64>) {
    match series.values.get(i).and_then(|p| p.value) {
        Some(IndicatorValue::Bollinger {
            upper,
            middle,
            lower,
        }) => (Some(upper), Some(middle), Some(lower)),
        _ => (None, None, None),
    }
}
