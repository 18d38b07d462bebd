//! RSI (Relative Strength Index) indicator.
//!
//! Average gain/loss are simple means over the last n close-to-close changes
//! (not Wilder's smoothing):
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: undefined.
//!
//! Warmup: first n bars are undefined (need n price changes).

use crate::domain::indicator::sma::sma_values;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(bars: &[Bar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.len() < 2 {
        let values = bars
            .iter()
            .map(|b| IndicatorPoint {
                date: b.date,
                value: None,
            })
            .collect();

        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values,
        };
    }

    let mut gains: Vec<f64> = Vec::with_capacity(bars.len() - 1);
    let mut losses: Vec<f64> = Vec::with_capacity(bars.len() - 1);

    for pair in bars.windows(2) {
        let change = pair[1].change_from(pair[0].close);
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let avg_gains = sma_values(&gains, period);
    let avg_losses = sma_values(&losses, period);

    let mut values = Vec::with_capacity(bars.len());
    values.push(IndicatorPoint {
        date: bars[0].date,
        value: None,
    });

    for (i, bar) in bars.iter().enumerate().skip(1) {
        let rsi = match (avg_gains[i - 1], avg_losses[i - 1]) {
            (Some(avg_gain), Some(avg_loss)) if avg_loss > 0.0 => {
                Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
            }
            _ => None,
        };
        values.push(IndicatorPoint {
            date: bar.date,
            value: rsi.map(IndicatorValue::Simple),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
