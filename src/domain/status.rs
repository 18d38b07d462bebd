//! Live status check: same-day evaluation of the latest bar, and the
//! serializable payloads returned for it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::error::TrendSignalError;
use crate::domain::indicator_engine::compute_snapshots;
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::{Decision, SignalParams, evaluate};
use crate::domain::snapshot::IndicatorSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct StatusOutcome {
    pub ticker: String,
    pub current_price: f64,
    pub decision: Decision,
    pub latest: IndicatorSnapshot,
}

/// Evaluates the last bar of `series`. `price_override` stands in for a
/// fresher quote than the last close.
pub fn evaluate_status(
    series: &PriceSeries,
    price_override: Option<f64>,
    params: &SignalParams,
) -> Result<StatusOutcome, TrendSignalError> {
    series.require_data()?;

    let mut snapshots = compute_snapshots(series);
    let Some(latest) = snapshots.pop() else {
        return Err(TrendSignalError::NoData {
            ticker: series.ticker().to_string(),
        });
    };
    let previous = snapshots.last();
    let current_price = price_override.unwrap_or(latest.close);
    let decision = evaluate(&latest, previous, current_price, params);

    Ok(StatusOutcome {
        ticker: series.ticker().to_string(),
        current_price,
        decision,
        latest,
    })
}

/// Round half away from zero to 2 decimals; display boundary only.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub ticker: String,
    pub as_of: String,
    pub decision: String,
    pub reason: String,
    pub current_price: f64,
    #[serde(rename = "MA_5")]
    pub ma_5: Option<f64>,
    #[serde(rename = "MA_25")]
    pub ma_25: Option<f64>,
    #[serde(rename = "MA_99")]
    pub ma_99: Option<f64>,
    pub indicators: BTreeMap<&'static str, Option<f64>>,
    /// Retracement price keyed by ratio label ("23.6%").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fibonacci: Option<BTreeMap<String, f64>>,
}

impl From<&StatusOutcome> for StatusReport {
    fn from(outcome: &StatusOutcome) -> Self {
        let latest = &outcome.latest;
        let indicators = latest
            .named_values()
            .into_iter()
            .map(|(name, value)| (name, value.map(round2)))
            .collect();
        let fibonacci = latest.fibonacci.map(|fib| {
            fib.levels
                .iter()
                .map(|level| (format!("{:.1}%", level.ratio * 100.0), round2(level.price)))
                .collect()
        });

        StatusReport {
            ticker: outcome.ticker.clone(),
            as_of: latest.date.format("%Y-%m-%d").to_string(),
            decision: outcome.decision.action.to_string(),
            reason: outcome.decision.reason(),
            current_price: round2(outcome.current_price),
            ma_5: latest.ma_5.map(round2),
            ma_25: latest.ma_25.map(round2),
            ma_99: latest.ma_99.map(round2),
            indicators,
            fibonacci,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub error: String,
}

impl From<&TrendSignalError> for ErrorReport {
    fn from(err: &TrendSignalError) -> Self {
        ErrorReport {
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;
    use crate::domain::signal::Action;

    fn series(prices: &[f64]) -> PriceSeries {
        PriceSeries::new("ACME", make_bars(prices)).unwrap()
    }

    #[test]
    fn round2_display_values() {
        assert_eq!(round2(13.604), 13.6);
        assert_eq!(round2(13.605_1), 13.61);
        assert_eq!(round2(-2.345_6), -2.35);
        assert_eq!(round2(7.0), 7.0);
    }

    #[test]
    fn empty_series_is_no_data() {
        let err = evaluate_status(&series(&[]), None, &SignalParams::default()).unwrap_err();
        assert!(matches!(err, TrendSignalError::NoData { .. }));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn short_history_holds() {
        let outcome =
            evaluate_status(&series(&[10.0, 11.0, 12.0]), None, &SignalParams::default()).unwrap();
        assert_eq!(outcome.decision.action, Action::Hold);
        assert_eq!(outcome.current_price, 12.0);
        assert!(outcome.latest.ma_5.is_none());
    }

    #[test]
    fn price_override_drives_decision() {
        let prices = vec![100.0; 30];
        let params = SignalParams::default();
        let below = evaluate_status(&series(&prices), Some(90.0), &params).unwrap();
        assert_eq!(below.decision.action, Action::Exit);
        assert_eq!(below.current_price, 90.0);

        let above = evaluate_status(&series(&prices), Some(101.0), &params).unwrap();
        assert_eq!(above.decision.action, Action::Buy);
    }

    #[test]
    fn report_rounds_and_names_fields() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64 / 3.0).collect();
        let outcome = evaluate_status(&series(&prices), Some(123.456), &SignalParams::default())
            .unwrap();
        let report = StatusReport::from(&outcome);
        assert_eq!(report.current_price, 123.46);
        assert_eq!(report.decision, "Buy");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ticker"], "ACME");
        assert_eq!(json["MA_99"], serde_json::Value::Null);
        assert!(json["MA_5"].is_number());
        assert!(json["indicators"]["OBV"].is_number());
        assert_eq!(json["indicators"]["RSI_14"], serde_json::Value::Null);
        assert_eq!(json["indicators"].as_object().unwrap().len(), 15);
        assert!(json["fibonacci"]["61.8%"].is_number());
    }

    #[test]
    fn flat_series_omits_fibonacci() {
        let outcome = evaluate_status(&series(&[50.0; 10]), None, &SignalParams::default()).unwrap();
        let json = serde_json::to_value(StatusReport::from(&outcome)).unwrap();
        assert!(json.get("fibonacci").is_none());
    }

    #[test]
    fn error_report_payload() {
        let err = TrendSignalError::MissingInput {
            field: "ticker".to_string(),
        };
        let json = serde_json::to_string(&ErrorReport::from(&err)).unwrap();
        assert_eq!(json, r#"{"error":"ticker is required"}"#);
    }
}
