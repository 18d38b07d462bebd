//! Daily OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// Checks the per-bar invariants; returns the reason on failure.
    pub fn check(&self) -> Result<(), String> {
        if !self.close.is_finite() || self.close <= 0.0 {
            return Err(format!("close must be positive, got {}", self.close));
        }
        if self.volume < 0 {
            return Err(format!("volume must be non-negative, got {}", self.volume));
        }
        for (name, value) in [("open", self.open), ("high", self.high), ("low", self.low)] {
            if !value.is_finite() {
                return Err(format!("{name} must be finite, got {value}"));
            }
        }
        Ok(())
    }

    /// Signed close-to-close change against the prior bar.
    pub fn change_from(&self, prev_close: f64) -> f64 {
        self.close - prev_close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000,
        }
    }

    #[test]
    fn valid_bar_passes() {
        assert!(sample_bar().check().is_ok());
    }

    #[test]
    fn zero_close_rejected() {
        let bar = Bar {
            close: 0.0,
            ..sample_bar()
        };
        let reason = bar.check().unwrap_err();
        assert!(reason.contains("close"));
    }

    #[test]
    fn nan_close_rejected() {
        let bar = Bar {
            close: f64::NAN,
            ..sample_bar()
        };
        assert!(bar.check().is_err());
    }

    #[test]
    fn negative_volume_rejected() {
        let bar = Bar {
            volume: -1,
            ..sample_bar()
        };
        let reason = bar.check().unwrap_err();
        assert!(reason.contains("volume"));
    }

    #[test]
    fn infinite_high_rejected() {
        let bar = Bar {
            high: f64::INFINITY,
            ..sample_bar()
        };
        let reason = bar.check().unwrap_err();
        assert!(reason.contains("high"));
    }

    #[test]
    fn change_from_prior_close() {
        let bar = sample_bar();
        assert!((bar.change_from(100.0) - 5.0).abs() < f64::EPSILON);
        assert!((bar.change_from(110.0) + 5.0).abs() < f64::EPSILON);
    }
}
