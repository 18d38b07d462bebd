//! Per-bar indicator snapshot consumed by the signal policy.

use crate::domain::indicator::fibonacci::FibonacciLevels;
use chrono::NaiveDate;

/// Stable names for the scalar indicators of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKey {
    Ma5,
    Ma20,
    Ma25,
    Ma99,
    Rsi14,
    Ema12,
    Ema26,
    Macd,
    MacdSignal,
    BbUpper,
    BbMiddle,
    BbLower,
    Obv,
    RecentHigh,
    PriceDrop,
}

impl IndicatorKey {
    pub const ALL: [IndicatorKey; 15] = [
        IndicatorKey::Ma5,
        IndicatorKey::Ma20,
        IndicatorKey::Ma25,
        IndicatorKey::Ma99,
        IndicatorKey::Rsi14,
        IndicatorKey::Ema12,
        IndicatorKey::Ema26,
        IndicatorKey::Macd,
        IndicatorKey::MacdSignal,
        IndicatorKey::BbUpper,
        IndicatorKey::BbMiddle,
        IndicatorKey::BbLower,
        IndicatorKey::Obv,
        IndicatorKey::RecentHigh,
        IndicatorKey::PriceDrop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IndicatorKey::Ma5 => "MA_5",
            IndicatorKey::Ma20 => "MA_20",
            IndicatorKey::Ma25 => "MA_25",
            IndicatorKey::Ma99 => "MA_99",
            IndicatorKey::Rsi14 => "RSI_14",
            IndicatorKey::Ema12 => "EMA_12",
            IndicatorKey::Ema26 => "EMA_26",
            IndicatorKey::Macd => "MACD",
            IndicatorKey::MacdSignal => "MACD_signal",
            IndicatorKey::BbUpper => "BB_upper",
            IndicatorKey::BbMiddle => "BB_middle",
            IndicatorKey::BbLower => "BB_lower",
            IndicatorKey::Obv => "OBV",
            IndicatorKey::RecentHigh => "recent_high",
            IndicatorKey::PriceDrop => "price_drop",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub ma_5: Option<f64>,
    pub ma_20: Option<f64>,
    pub ma_25: Option<f64>,
    pub ma_99: Option<f64>,
    pub rsi_14: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub obv: Option<f64>,
    pub recent_high: Option<f64>,
    pub price_drop: Option<f64>,
    /// Series-wide levels; only the final snapshot carries them.
    pub fibonacci: Option<FibonacciLevels>,
}

impl IndicatorSnapshot {
    /// A snapshot with every indicator undefined.
    pub fn empty(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            ma_5: None,
            ma_20: None,
            ma_25: None,
            ma_99: None,
            rsi_14: None,
            ema_12: None,
            ema_26: None,
            macd: None,
            macd_signal: None,
            bb_upper: None,
            bb_middle: None,
            bb_lower: None,
            obv: None,
            recent_high: None,
            price_drop: None,
            fibonacci: None,
        }
    }

    pub fn get(&self, key: IndicatorKey) -> Option<f64> {
        match key {
            IndicatorKey::Ma5 => self.ma_5,
            IndicatorKey::Ma20 => self.ma_20,
            IndicatorKey::Ma25 => self.ma_25,
            IndicatorKey::Ma99 => self.ma_99,
            IndicatorKey::Rsi14 => self.rsi_14,
            IndicatorKey::Ema12 => self.ema_12,
            IndicatorKey::Ema26 => self.ema_26,
            IndicatorKey::Macd => self.macd,
            IndicatorKey::MacdSignal => self.macd_signal,
            IndicatorKey::BbUpper => self.bb_upper,
            IndicatorKey::BbMiddle => self.bb_middle,
            IndicatorKey::BbLower => self.bb_lower,
            IndicatorKey::Obv => self.obv,
            IndicatorKey::RecentHigh => self.recent_high,
            IndicatorKey::PriceDrop => self.price_drop,
        }
    }

    /// `(name, value)` pairs in [`IndicatorKey::ALL`] order.
    pub fn named_values(&self) -> Vec<(&'static str, Option<f64>)> {
        IndicatorKey::ALL
            .iter()
            .map(|&key| (key.name(), self.get(key)))
            .collect()
    }
}
