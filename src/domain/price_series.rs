//! Validated, date-ordered series of daily bars for one instrument.

use crate::domain::error::TrendSignalError;
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Builds a series, rejecting invalid bars and dates that are not
    /// strictly increasing. An empty bar list is accepted.
    pub fn new(ticker: impl Into<String>, bars: Vec<Bar>) -> Result<Self, TrendSignalError> {
        let ticker = ticker.into();

        for bar in &bars {
            bar.check().map_err(|reason| TrendSignalError::InvalidBar {
                ticker: ticker.clone(),
                date: bar.date,
                reason,
            })?;
        }

        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(TrendSignalError::UnorderedDates {
                    ticker,
                    previous: pair[0].date,
                    date: pair[1].date,
                });
            }
        }

        Ok(Self { ticker, bars })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// The last `n` bars as a new series (the whole series if shorter).
    pub fn tail(&self, n: usize) -> PriceSeries {
        let start = self.bars.len().saturating_sub(n);
        PriceSeries {
            ticker: self.ticker.clone(),
            bars: self.bars[start..].to_vec(),
        }
    }

    /// Fails with `NoData` when the series is empty.
    pub fn require_data(&self) -> Result<(), TrendSignalError> {
        if self.bars.is_empty() {
            return Err(TrendSignalError::NoData {
                ticker: self.ticker.clone(),
            });
        }
        Ok(())
    }
}
