//! Fibonacci retracement levels.
//!
//! One set of levels per series (not per bar), measured down from the
//! highest close: level(r) = max - r * (max - min).

use crate::domain::ohlcv::Bar;

pub const RATIOS: [f64; 5] = [0.236, 0.382, 0.5, 0.618, 0.786];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibonacciLevel {
    pub ratio: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibonacciLevels {
    pub high: f64,
    pub low: f64,
    pub levels: [FibonacciLevel; 5],
}

impl FibonacciLevels {
    /// First level (in ascending ratio order) within `tolerance` of `price`,
    /// measured relative to the level.
    pub fn nearest_within(&self, price: f64, tolerance: f64) -> Option<FibonacciLevel> {
        self.levels
            .iter()
            .find(|level| level.price > 0.0 && ((price - level.price) / level.price).abs() <= tolerance)
            .copied()
    }
}

/// Levels over all closes. `None` for an empty series or a zero range.
pub fn calculate_fibonacci(bars: &[Bar]) -> Option<FibonacciLevels> {
    let high = bars.iter().map(|b| b.close).reduce(f64::max)?;
    let low = bars.iter().map(|b| b.close).reduce(f64::min)?;
    let range = high - low;
    if range <= 0.0 {
        return None;
    }

    let levels = RATIOS.map(|ratio| FibonacciLevel {
        ratio,
        price: high - ratio * range,
    });

    Some(FibonacciLevels { high, low, levels })
}
