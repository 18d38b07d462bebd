//! Market data provider contract.

use crate::domain::error::TrendSignalError;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// The most recent `lookback` daily bars for `ticker`, oldest first.
    fn fetch_series(&self, ticker: &str, lookback: usize)
    -> Result<PriceSeries, TrendSignalError>;

    fn list_tickers(&self) -> Result<Vec<String>, TrendSignalError>;

    /// First date, last date and bar count, or `None` when the ticker has no
    /// bars.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendSignalError>;
}
