use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// How commission is folded into a day's P&L.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PnlMode {
    /// `profit + swap - |commission|`
    #[default]
    Net,
    /// `profit + commission + swap`
    Gross,
}

impl PnlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PnlMode::Net => "NET",
            PnlMode::Gross => "GROSS",
        }
    }
}

impl fmt::Display for PnlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PnlMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NET" => Ok(PnlMode::Net),
            "GROSS" => Ok(PnlMode::Gross),
            other => Err(Error::InvalidConfigValue(format!(
                "unknown P&L mode '{}', expected NET or GROSS",
                other
            ))),
        }
    }
}

/// Aggregate for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPnlEntry {
    pub pnl: Decimal,
    pub trade_count: u32,
}

/// Daily P&L keyed by `DD-MM-YYYY` (or the invalid-date bucket).
pub type DailyPnl = HashMap<String, DailyPnlEntry>;

/// One point of the running-total series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativePoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub value: Decimal,
}

/// A daily entry with its day resolved, for chronologically ordered charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPnlPoint {
    pub date: NaiveDate,
    pub pnl: Decimal,
    pub trade_count: u32,
}

/// Headline figures derived from the daily map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlSummary {
    pub total_pnl: Decimal,
    pub total_trades: u32,
    /// Days with at least one trade and a valid date
    pub trading_days: u32,
    pub winning_days: u32,
    pub losing_days: u32,
    pub best_day: Option<DailyPnlPoint>,
    pub worst_day: Option<DailyPnlPoint>,
    /// Trades whose date could not be resolved to a day
    pub undated_trades: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlReport {
    pub mode: PnlMode,
    pub daily: DailyPnl,
    pub daily_series: Vec<DailyPnlPoint>,
    pub cumulative: Vec<CumulativePoint>,
    pub summary: PnlSummary,
}
