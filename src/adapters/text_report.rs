//! Plain-text backtest report adapter implementing ReportPort.

use std::io::Write;

use crate::domain::error::TrendSignalError;
use crate::domain::ledger::TradeRecord;
use crate::domain::simulator::BacktestResult;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter {
    /// Append the per-trade log after the summary.
    pub include_trades: bool,
}

impl TextReportAdapter {
    pub fn new() -> Self {
        Self {
            include_trades: true,
        }
    }

    pub fn summary_only() -> Self {
        Self {
            include_trades: false,
        }
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TextReportAdapter {
    fn write_backtest(
        &self,
        result: &BacktestResult,
        out: &mut dyn Write,
    ) -> Result<(), TrendSignalError> {
        out.write_all(render_summary(result).as_bytes())?;
        if self.include_trades {
            writeln!(out)?;
            out.write_all(format_trade_log(&result.ledger.trades).as_bytes())?;
        }
        out.flush()?;
        Ok(())
    }
}

pub fn render_summary(result: &BacktestResult) -> String {
    let mut s = format!("----- Backtest Results: {} -----\n", result.ticker);
    if let (Some(first), Some(last)) = (result.daily_values.first(), result.daily_values.last()) {
        s.push_str(&format!(
            "Period:            {} to {} ({} days)\n",
            first.date,
            last.date,
            result.daily_values.len()
        ));
    }
    s.push_str(&format!(
        "Initial Capital:   {}\n",
        format_currency(result.initial_capital)
    ));
    s.push_str(&format!(
        "Final Portfolio:   {}\n",
        format_currency(result.final_value)
    ));
    s.push_str(&format!(
        "Net Profit/Loss:   {}\n",
        format_currency(result.net_profit)
    ));
    s.push_str(&format!("Return (%):        {:.2}%\n", result.return_pct));
    s.push_str(&format!(
        "Max Drawdown:      {:.2}% ({} days)\n",
        result.metrics.max_drawdown * 100.0,
        result.metrics.max_drawdown_duration
    ));
    s.push_str(&format!(
        "Trades:            {} buys, {} sells\n",
        result.metrics.trades_buy, result.metrics.trades_sell
    ));
    s
}

pub fn format_trade_log(trades: &[TradeRecord]) -> String {
    if trades.is_empty() {
        return "No trades executed.\n".to_string();
    }

    let mut output = format!(
        "{:<10}  {:<18}  {:>6}  {:>12}  {:>14}\n",
        "Date", "Action", "Shares", "Price", "Cash After"
    );
    for trade in trades {
        output.push_str(&format!(
            "{:<10}  {:<18}  {:>6}  {:>12}  {:>14}\n",
            trade.date.format("%Y-%m-%d"),
            trade.kind.to_string(),
            trade.shares,
            format_currency(trade.price),
            format_currency(trade.cash_after)
        ));
    }
    output
}

/// `$1,234.56`; negatives render as `$-1,234.56`.
pub fn format_currency(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("${}{}.{}", sign, grouped, cents)
}
