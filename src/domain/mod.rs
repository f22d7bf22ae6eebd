//! Core domain types and logic.

pub mod average;
pub mod backtest;
pub mod config_validation;
pub mod error;
pub mod performance;
pub mod price;
pub mod signal;
pub mod simulator;
