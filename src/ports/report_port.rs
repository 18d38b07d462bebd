//! Report generation port trait.

use std::io::Write;

use crate::domain::error::TrendSignalError;
use crate::domain::simulator::BacktestResult;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write_backtest(
        &self,
        result: &BacktestResult,
        out: &mut dyn Write,
    ) -> Result<(), TrendSignalError>;
}
