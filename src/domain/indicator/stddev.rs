//! Rolling sample standard deviation of closes, used by the Bollinger bands.
//!
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n-1) / (n-1))
//! Warmup: first (n-1) bars are undefined. A window of 1 has no sample
//! deviation and is undefined throughout.

use crate::domain::ohlcv::Bar;

/// Sample standard deviation of the `period` closes ending at `end`.
pub(crate) fn window_stddev(bars: &[Bar], end: usize, period: usize) -> Option<f64> {
    if period < 2 || end + 1 < period || end >= bars.len() {
        return None;
    }

    let window = &bars[end + 1 - period..=end];
    let mean: f64 = window.iter().map(|b| b.close).sum::<f64>() / period as f64;

    let variance: f64 = window
        .iter()
        .map(|b| {
            let diff = b.close - mean;
            diff * diff
        })
        .sum::<f64>()
        / (period - 1) as f64;

    Some(variance.sqrt())
}
