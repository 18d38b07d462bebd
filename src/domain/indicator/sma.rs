//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i])
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;

pub fn calculate_sma(bars: &[Bar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let means = sma_values(&closes, period);

    let values = bars
        .iter()
        .zip(means)
        .map(|(bar, mean)| IndicatorPoint {
            date: bar.date,
            value: mean.map(IndicatorValue::Simple),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}

/// Windowed means over raw values. Each window is summed afresh so the value
/// at index `n-1` is exactly the mean of the first `n` inputs.
pub fn sma_values(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let window = &values[i + 1 - period..=i];
            Some(window.iter().sum::<f64>() / period as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn sma_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_sma(&bars, 3);

        assert!(series.values[0].value.is_none());
        assert!(series.values[1].value.is_none());
        assert_eq!(series.values[2].simple(), Some(20.0));
        assert_eq!(series.values[3].simple(), Some(30.0));
        assert_eq!(series.values[4].simple(), Some(40.0));
    }

    #[test]
    fn sma_shorter_than_window_is_undefined() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_sma(&bars, 5);
        assert_eq!(series.values.len(), 3);
        assert!(series.values.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn sma_zero_period() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_sma(&bars, 0);
        assert!(series.values.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn sma_empty_bars() {
        let series = calculate_sma(&[], 5);
        assert!(series.values.is_empty());
        assert_eq!(series.indicator_type, IndicatorType::Sma(5));
    }

    #[test]
    fn sma_step_series_final_bar() {
        let mut closes = vec![10.0; 5];
        closes.extend(std::iter::repeat(12.0).take(20));
        closes.push(20.0);
        assert_eq!(closes.len(), 26);

        let bars = make_bars(&closes);
        let series = calculate_sma(&bars, 5);

        // last five closes are [12, 12, 12, 12, 20]
        let last = series.values[25].simple().unwrap();
        assert_relative_eq!(last, (12.0 * 4.0 + 20.0) / 5.0);
        assert_relative_eq!(last, 13.6);
    }

    proptest! {
        #[test]
        fn sma_first_defined_value_is_mean(
            closes in prop::collection::vec(0.01f64..10_000.0, 1..60),
            period in 1usize..30,
        ) {
            let values = sma_values(&closes, period);
            if closes.len() < period {
                prop_assert!(values.iter().all(Option::is_none));
            } else {
                let expected = closes[..period].iter().sum::<f64>() / period as f64;
                prop_assert_eq!(values[period - 1], Some(expected));
                prop_assert!(values[..period - 1].iter().all(Option::is_none));
            }
        }
    }
}
