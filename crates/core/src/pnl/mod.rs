//! P&L module - daily and cumulative profit/loss aggregation.

mod pnl_calculator;
mod pnl_model;
mod pnl_service;


#[cfg(test)]
mod pnl_service_tests;

pub use pnl_calculator::{
    compute_cumulative_pnl, compute_daily_pnl, compute_daily_pnl_series, daily_key,
    summarize_daily_pnl,
};
pub use pnl_model::*;
pub use pnl_service::{PnlService, PnlServiceTrait};
