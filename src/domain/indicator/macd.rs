//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! All three EMAs are recursive and seeded with their first input, so every
//! bar is defined. Values before roughly `slow` bars are still settling.

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[Bar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };

    if fast == 0 || slow == 0 || signal_period == 0 {
        let values = bars
            .iter()
            .map(|b| IndicatorPoint {
                date: b.date,
                value: None,
            })
            .collect();
        return IndicatorSeries {
            indicator_type,
            values,
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_values(&closes, fast);
    let ema_slow = ema_values(&closes, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_values(&macd_line, signal_period);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            date: bar.date,
            value: Some(IndicatorValue::Macd {
                line: macd_line[i],
                signal: signal_line[i],
                histogram: macd_line[i] - signal_line[i],
            }),
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

pub fn calculate_macd_default(bars: &[Bar]) -> IndicatorSeries {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;
    use approx::assert_relative_eq;

    fn unpack(value: Option<IndicatorValue>) -> (f64, f64, f64) {
        match value {
            Some(IndicatorValue::Macd {
                line,
                signal,
                histogram,
            }) => (line, signal, histogram),
            other => panic!("Expected Macd value, got {other:?}"),
        }
    }

    #[test]
    fn macd_first_bar_is_zero() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let series = calculate_macd_default(&bars);
        let (line, signal, histogram) = unpack(series.values[0].value);
        assert_eq!(line, 0.0);
        assert_eq!(signal, 0.0);
        assert_eq!(histogram, 0.0);
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let bars = make_bars(&prices);
        let series = calculate_macd_default(&bars);

        let fast = ema_values(&prices, 12);
        let slow = ema_values(&prices, 26);
        for (i, point) in series.values.iter().enumerate() {
            let (line, _, _) = unpack(point.value);
            assert_relative_eq!(line, fast[i] - slow[i]);
        }
    }

    #[test]
    fn macd_histogram_equals_line_minus_signal() {
        let prices: Vec<f64> = (0..50).map(|i| 50.0 + i as f64).collect();
        let bars = make_bars(&prices);
        let series = calculate_macd_default(&bars);

        for point in &series.values {
            let (line, signal, histogram) = unpack(point.value);
            assert_relative_eq!(histogram, line - signal);
        }
    }

    #[test]
    fn macd_rising_prices_positive_line() {
        let prices: Vec<f64> = (0..60).map(|i| 50.0 + i as f64).collect();
        let bars = make_bars(&prices);
        let series = calculate_macd_default(&bars);
        let (line, _, _) = unpack(series.values[59].value);
        assert!(line > 0.0);
    }

    #[test]
    fn macd_indicator_type() {
        let series = calculate_macd_default(&[]);
        assert!(series.values.is_empty());
        assert_eq!(
            series.indicator_type,
            IndicatorType::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
        );
    }

    #[test]
    fn macd_zero_period() {
        let bars = make_bars(&[100.0, 101.0]);
        let series = calculate_macd(&bars, 0, 26, 9);
        assert_eq!(series.values.len(), 2);
        assert!(series.values.iter().all(|p| p.value.is_none()));
    }
}
