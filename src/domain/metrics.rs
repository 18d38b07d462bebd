//! Summary statistics over a backtest's daily value curve.

use super::ledger::{EquityPoint, Ledger};

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    /// Largest peak-to-trough decline as a fraction of the peak.
    pub max_drawdown: f64,
    /// Longest run of simulated days spent below a prior peak.
    pub max_drawdown_duration: i64,
    pub trades_buy: usize,
    pub trades_sell: usize,
}

impl Metrics {
    pub fn compute(daily_values: &[EquityPoint], ledger: &Ledger) -> Self {
        let (max_drawdown, max_drawdown_duration) = compute_drawdown(daily_values);

        Metrics {
            max_drawdown,
            max_drawdown_duration,
            trades_buy: ledger.buy_count(),
            trades_sell: ledger.sell_count(),
        }
    }
}

fn compute_drawdown(curve: &[EquityPoint]) -> (f64, i64) {
    let Some(first) = curve.first() else {
        return (0.0, 0);
    };

    let mut peak = first.value;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0i64;
    let mut current_dd_duration = 0i64;

    for point in curve {
        if point.value >= peak {
            peak = point.value;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            let dd = (peak - point.value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
            current_dd_duration += 1;
            if current_dd_duration > max_dd_duration {
                max_dd_duration = current_dd_duration;
            }
        }
    }

    (max_dd, max_dd_duration)
}
