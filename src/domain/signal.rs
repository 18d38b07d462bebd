//! Signal policy: maps indicator snapshots to a trading decision.
//!
//! Two evaluation modes exist and are kept separate:
//! - same-day ([`evaluate`]): the live status check compares the current
//!   price against the same bar's indicators.
//! - previous-day (`backtest_signal::evaluate_previous_day`): the backtest
//!   compares the prior bar's close against the prior bar's indicators.

use std::fmt;

use crate::domain::snapshot::IndicatorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Hold,
    Buy,
    Exit,
    BuyMore,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Hold => write!(f, "Hold"),
            Action::Buy => write!(f, "Buy"),
            Action::Exit => write!(f, "Exit"),
            Action::BuyMore => write!(f, "Buy More"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    /// Action rationale first, advisory notes after.
    pub reasons: Vec<String>,
}

impl Decision {
    pub fn reason(&self) -> String {
        self.reasons.join(" ")
    }
}

/// Thresholds for the rule chain and the advisory notes.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalParams {
    pub dip_threshold: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub fib_tolerance: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        SignalParams {
            dip_threshold: 0.05,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            fib_tolerance: 0.01,
        }
    }
}

/// Same-day evaluation of the rule chain. Later rules override earlier ones.
///
/// `current_close` may be fresher than `current.close` (e.g. an intraday
/// quote); every price comparison uses it.
pub fn evaluate(
    current: &IndicatorSnapshot,
    previous: Option<&IndicatorSnapshot>,
    current_close: f64,
    params: &SignalParams,
) -> Decision {
    let mut action = Action::Hold;
    let mut rationale = "No strong signal detected.";

    if let (Some(ma_5), Some(ma_25)) = (current.ma_5, current.ma_25) {
        if current_close > ma_5 && current_close > ma_25 {
            action = Action::Buy;
            rationale = "Current price above both 5-day and 25-day MAs.";
        }
    }

    if let Some(ma_25) = current.ma_25 {
        if current_close < ma_25 {
            action = Action::Exit;
            rationale = "Current price dropped below 25-day MA.";
        }
    }

    if golden_cross(current, previous) && current.ma_25.is_some_and(|ma| current_close > ma) {
        action = Action::BuyMore;
        rationale = "Golden cross detected (25-day MA crossed above 99-day MA).";
    }

    if let (Some(high), Some(ma_25)) = (current.recent_high, current.ma_25) {
        if high > 0.0
            && current_close > ma_25
            && (high - current_close) / high >= params.dip_threshold
        {
            action = Action::BuyMore;
            rationale = "Price dropped from its recent daily high but is still above 25-day MA.";
        }
    }

    let mut reasons = vec![rationale.to_string()];
    reasons.extend(advisory_notes(current, previous, current_close, params));

    Decision { action, reasons }
}

/// MA_25 crossed above MA_99 between `previous` and `current`.
pub fn golden_cross(current: &IndicatorSnapshot, previous: Option<&IndicatorSnapshot>) -> bool {
    let Some(previous) = previous else {
        return false;
    };
    match (current.ma_25, current.ma_99, previous.ma_25, previous.ma_99) {
        (Some(ma_25), Some(ma_99), Some(prev_25), Some(prev_99)) => {
            ma_25 > ma_99 && prev_25 <= prev_99
        }
        _ => false,
    }
}

/// Informational notes; they never change the action.
pub fn advisory_notes(
    current: &IndicatorSnapshot,
    previous: Option<&IndicatorSnapshot>,
    current_close: f64,
    params: &SignalParams,
) -> Vec<String> {
    let mut notes = Vec::new();

    if let Some(rsi) = current.rsi_14 {
        if rsi < params.rsi_oversold {
            notes.push(format!("RSI {rsi:.2} indicates oversold conditions."));
        } else if rsi > params.rsi_overbought {
            notes.push(format!("RSI {rsi:.2} indicates overbought conditions."));
        }
    }

    if let Some(prev) = previous {
        if let (Some(macd), Some(signal), Some(prev_macd), Some(prev_signal)) =
            (current.macd, current.macd_signal, prev.macd, prev.macd_signal)
        {
            if prev_macd <= prev_signal && macd > signal {
                notes.push("MACD crossed above its signal line (bullish).".to_string());
            } else if prev_macd >= prev_signal && macd < signal {
                notes.push("MACD crossed below its signal line (bearish).".to_string());
            }
        }
    }

    if current.bb_upper.is_some_and(|upper| current_close > upper) {
        notes.push("Price is above the upper Bollinger Band.".to_string());
    } else if current.bb_lower.is_some_and(|lower| current_close < lower) {
        notes.push("Price is below the lower Bollinger Band.".to_string());
    }

    if let (Some(obv), Some(prev_obv)) = (current.obv, previous.and_then(|p| p.obv)) {
        if obv > prev_obv {
            notes.push("On-Balance Volume is rising.".to_string());
        } else if obv < prev_obv {
            notes.push("On-Balance Volume is falling.".to_string());
        }
    }

    if let Some(level) = current
        .fibonacci
        .and_then(|fib| fib.nearest_within(current_close, params.fib_tolerance))
    {
        notes.push(format!(
            "Price is near the {:.1}% Fibonacci retracement level ({:.2}).",
            level.ratio * 100.0,
            level.price
        ));
    }

    notes
}
