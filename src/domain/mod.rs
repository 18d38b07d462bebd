//! Core domain types and logic.

pub mod ohlcv;
pub mod price_series;
pub mod indicator;
pub mod indicator_engine;
pub mod snapshot;
pub mod signal;
pub mod backtest_signal;
pub mod ledger;
pub mod simulator;
pub mod metrics;
pub mod status;
pub mod config_validation;
pub mod error;
