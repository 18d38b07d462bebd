//! Cash/shares ledger mutated by the backtest simulator.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    InitialBuy,
    DipBuy,
    GoldenCrossBuy,
    Sell,
}

impl TradeKind {
    pub fn is_buy(self) -> bool {
        !matches!(self, TradeKind::Sell)
    }
}

impl fmt::Display for TradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeKind::InitialBuy => write!(f, "BUY"),
            TradeKind::DipBuy => write!(f, "BUY (dip)"),
            TradeKind::GoldenCrossBuy => write!(f, "BUY (golden cross)"),
            TradeKind::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub kind: TradeKind,
    pub shares: u64,
    pub price: f64,
    pub cash_after: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub cash: f64,
    pub initial_capital: f64,
    pub shares_held: u64,
    /// Size-weighted average purchase price; 0 while flat.
    pub avg_cost_basis: f64,
    pub trades: Vec<TradeRecord>,
}

impl Ledger {
    pub fn new(initial_capital: f64) -> Self {
        Ledger {
            cash: initial_capital,
            initial_capital,
            shares_held: 0,
            avg_cost_basis: 0.0,
            trades: Vec::new(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.shares_held == 0
    }

    pub fn can_afford(&self, budget: f64) -> bool {
        self.cash >= budget
    }

    /// Spend up to `budget` on whole shares at `price`.
    ///
    /// Returns the number of shares bought, or `None` when not even one share
    /// fits the budget. The cost basis becomes the size-weighted average of
    /// the held and the new shares.
    pub fn buy_lot(
        &mut self,
        date: NaiveDate,
        price: f64,
        budget: f64,
        kind: TradeKind,
    ) -> Option<u64> {
        if price.is_nan() || price <= 0.0 || budget.is_nan() || budget <= 0.0 {
            return None;
        }
        let shares = (budget / price).floor() as u64;
        if shares == 0 {
            return None;
        }

        let total_shares = self.shares_held + shares;
        self.avg_cost_basis = (self.avg_cost_basis * self.shares_held as f64
            + price * shares as f64)
            / total_shares as f64;
        self.shares_held = total_shares;
        self.cash -= price * shares as f64;

        self.trades.push(TradeRecord {
            date,
            kind,
            shares,
            price,
            cash_after: self.cash,
        });
        Some(shares)
    }

    /// Liquidate the whole position at `price`. Returns the shares sold.
    pub fn sell_all(&mut self, date: NaiveDate, price: f64) -> Option<u64> {
        if self.shares_held == 0 {
            return None;
        }
        let shares = self.shares_held;
        self.cash += price * shares as f64;
        self.shares_held = 0;
        self.avg_cost_basis = 0.0;

        self.trades.push(TradeRecord {
            date,
            kind: TradeKind::Sell,
            shares,
            price,
            cash_after: self.cash,
        });
        Some(shares)
    }

    /// Fractional drop of `price` below the average cost; `None` while flat.
    pub fn drop_from_cost(&self, price: f64) -> Option<f64> {
        if self.shares_held == 0 || self.avg_cost_basis <= 0.0 {
            return None;
        }
        Some((self.avg_cost_basis - price) / self.avg_cost_basis)
    }

    pub fn value(&self, price: f64) -> f64 {
        self.cash + self.shares_held as f64 * price
    }

    pub fn buy_count(&self) -> usize {
        self.trades.iter().filter(|t| t.kind.is_buy()).count()
    }

    pub fn sell_count(&self) -> usize {
        self.trades.len() - self.buy_count()
    }
}
