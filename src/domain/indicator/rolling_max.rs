//! Rolling maximum of closes ("recent high").
//!
//! MAX(n)[i] = max(C[i-n+1..=i]). Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;

pub const RECENT_HIGH_PERIOD: usize = 5;

pub fn calculate_rolling_max(bars: &[Bar], period: usize) -> IndicatorSeries {
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let value = if period == 0 || i + 1 < period {
                None
            } else {
                bars[i + 1 - period..=i]
                    .iter()
                    .map(|b| b.close)
                    .reduce(f64::max)
                    .map(IndicatorValue::Simple)
            };
            IndicatorPoint {
                date: bar.date,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::RollingMax(period),
        values,
    }
}

/// Fractional drop from a recent high: `(high - close) / high`.
/// Undefined when the high is not positive.
pub fn drawdown_from_high(recent_high: f64, close: f64) -> Option<f64> {
    if recent_high > 0.0 {
        Some((recent_high - close) / recent_high)
    } else {
        None
    }
}
