//! Previous-day signal evaluation for the backtest.
//!
//! Day `i` is judged on bar `i-1`'s close against bar `i-1`'s moving
//! averages, so a trade at day `i`'s close never sees day `i`'s own signal.
//! The golden cross looks one bar further back (`i-2` → `i-1`).

use crate::domain::indicator_engine::MA_LONG;
use crate::domain::snapshot::IndicatorSnapshot;

/// Shortest series with at least one tradable day: the prior bar needs a
/// defined MA_99.
pub const MIN_BARS_TRADABLE: usize = MA_LONG + 1;

/// The backtest's per-day decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaySignal {
    /// Prior close above prior MA_5 and MA_25.
    pub buy: bool,
    /// Prior close below prior MA_25.
    pub sell: bool,
    /// MA_25 crossed above MA_99 between the two prior bars.
    pub golden_cross: bool,
    /// Same-day MA_25, used by the `close > MA_25` purchase guards.
    pub ma_25: f64,
}

/// One entry per snapshot; `None` marks a warm-up day that is not simulated
/// (same-day MA_99 or any prior-day moving average still undefined).
pub fn previous_day_signals(snapshots: &[IndicatorSnapshot]) -> Vec<Option<DaySignal>> {
    (0..snapshots.len())
        .map(|i| evaluate_previous_day(snapshots, i))
        .collect()
}

pub fn evaluate_previous_day(snapshots: &[IndicatorSnapshot], i: usize) -> Option<DaySignal> {
    if i == 0 || i >= snapshots.len() {
        return None;
    }
    let current = &snapshots[i];
    let prior = &snapshots[i - 1];

    current.ma_99?;
    let ma_25 = current.ma_25?;
    let prior_ma_5 = prior.ma_5?;
    let prior_ma_25 = prior.ma_25?;
    let prior_ma_99 = prior.ma_99?;

    let buy = prior.close > prior_ma_5 && prior.close > prior_ma_25;
    let sell = prior.close < prior_ma_25;

    let golden_cross = i >= 2 && {
        let before = &snapshots[i - 2];
        match (before.ma_25, before.ma_99) {
            (Some(before_25), Some(before_99)) => {
                prior_ma_25 > prior_ma_99 && before_25 <= before_99
            }
            _ => false,
        }
    };

    Some(DaySignal {
        buy,
        sell,
        golden_cross,
        ma_25,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snap(day: u32, close: f64, mas: Option<(f64, f64, f64)>) -> IndicatorSnapshot {
        let mut s = IndicatorSnapshot::empty(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), close);
        if let Some((ma_5, ma_25, ma_99)) = mas {
            s.ma_5 = Some(ma_5);
            s.ma_25 = Some(ma_25);
            s.ma_99 = Some(ma_99);
        }
        s
    }

    #[test]
    fn first_day_and_warmup_are_not_tradable() {
        let snaps = vec![
            snap(1, 10.0, None),
            snap(2, 10.0, Some((10.0, 10.0, 10.0))),
            snap(3, 10.0, Some((10.0, 10.0, 10.0))),
        ];
        let signals = previous_day_signals(&snaps);
        assert_eq!(signals.len(), 3);
        assert!(signals[0].is_none());
        assert!(signals[1].is_none());
        assert!(signals[2].is_some());
    }

    #[test]
    fn buy_uses_prior_bar() {
        let snaps = vec![
            snap(1, 12.0, Some((11.0, 10.0, 9.0))),
            snap(2, 5.0, Some((11.0, 10.0, 9.0))),
        ];
        let signal = evaluate_previous_day(&snaps, 1).unwrap();
        assert!(signal.buy);
        assert!(!signal.sell);
        assert_eq!(signal.ma_25, 10.0);
    }

    #[test]
    fn sell_uses_prior_bar() {
        let snaps = vec![
            snap(1, 9.0, Some((11.0, 10.0, 9.0))),
            snap(2, 50.0, Some((11.0, 10.0, 9.0))),
        ];
        let signal = evaluate_previous_day(&snaps, 1).unwrap();
        assert!(signal.sell);
        assert!(!signal.buy);
    }

    #[test]
    fn golden_cross_between_two_prior_bars() {
        let snaps = vec![
            snap(1, 10.0, Some((10.0, 9.0, 10.0))),
            snap(2, 10.0, Some((10.0, 11.0, 10.0))),
            snap(3, 10.0, Some((10.0, 12.0, 10.0))),
            snap(4, 10.0, Some((10.0, 13.0, 10.0))),
        ];
        assert!(!evaluate_previous_day(&snaps, 1).unwrap().golden_cross);
        assert!(evaluate_previous_day(&snaps, 2).unwrap().golden_cross);
        assert!(!evaluate_previous_day(&snaps, 3).unwrap().golden_cross);
    }

    #[test]
    fn golden_cross_false_when_two_back_undefined() {
        let snaps = vec![
            snap(1, 10.0, None),
            snap(2, 10.0, Some((10.0, 11.0, 10.0))),
            snap(3, 10.0, Some((10.0, 12.0, 10.0))),
        ];
        let signal = evaluate_previous_day(&snaps, 2).unwrap();
        assert!(!signal.golden_cross);
    }

    #[test]
    fn out_of_range_index() {
        let snaps = vec![snap(1, 10.0, Some((10.0, 10.0, 10.0)))];
        assert!(evaluate_previous_day(&snaps, 5).is_none());
    }
}
