//! P&L aggregation over a trade snapshot.
//!
//! Everything here is a pure function of its inputs. The only outside
//! dependency is the clock used for the empty-ledger placeholder.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;
use log::{debug, warn};
use rust_decimal::Decimal;

use super::pnl_model::{CumulativePoint, DailyPnl, DailyPnlEntry, DailyPnlPoint, PnlMode, PnlSummary};
use crate::constants::{DAILY_KEY_FORMAT, DISPLAY_DECIMAL_PRECISION, INVALID_DATE_KEY};
use crate::trades::Trade;
use crate::utils::time_utils::{parse_trade_day, Clock};

/// Day key used by [`compute_daily_pnl`].
pub fn daily_key(date: NaiveDate) -> String {
    date.format(DAILY_KEY_FORMAT).to_string()
}

fn trade_pnl(trade: &Trade, mode: PnlMode) -> Decimal {
    match mode {
        PnlMode::Gross => trade.gross_pnl(),
        PnlMode::Net => trade.net_pnl(),
    }
}

/// Groups trades by calendar day and sums their P&L under `mode`.
///
/// Dates are resolved in `tz` and keyed as `DD-MM-YYYY`. Trades whose date
/// cannot be parsed are collected under [`INVALID_DATE_KEY`].
///
/// An empty ledger still yields one entry: today's key (per `clock`) with a
/// zero P&L and zero trades.
pub fn compute_daily_pnl(trades: &[Trade], mode: PnlMode, clock: &dyn Clock, tz: Tz) -> DailyPnl {
    let mut daily = DailyPnl::new();

    if trades.is_empty() {
        daily.insert(daily_key(clock.today(tz)), DailyPnlEntry::default());
        return daily;
    }

    for trade in trades {
        let key = match parse_trade_day(&trade.date, tz) {
            Some(day) => daily_key(day),
            None => {
                warn!(
                    "Trade {} has unparseable date '{}', bucketing under '{}'",
                    trade.id, trade.date, INVALID_DATE_KEY
                );
                INVALID_DATE_KEY.to_string()
            }
        };
        let entry = daily.entry(key).or_default();
        entry.pnl += trade_pnl(trade, mode);
        entry.trade_count += 1;
    }

    for entry in daily.values_mut() {
        entry.pnl = entry.pnl.round_dp(DISPLAY_DECIMAL_PRECISION);
    }

    debug!(
        "Aggregated {} trades into {} {} days",
        trades.len(),
        daily.len(),
        mode
    );
    daily
}

/// Builds the running-total series of gross P&L, one point per day.
///
/// Trade dates are taken as `YYYY-MM-DD` strings without reparsing; their
/// lexical order is their chronological order. An empty ledger yields an empty
/// series.
pub fn compute_cumulative_pnl(trades: &[Trade]) -> Vec<CumulativePoint> {
    let mut by_day: BTreeMap<&str, Decimal> = BTreeMap::new();
    for trade in trades {
        *by_day.entry(trade.date.as_str()).or_insert(Decimal::ZERO) += trade.gross_pnl();
    }

    let mut running_total = Decimal::ZERO;
    by_day
        .into_iter()
        .map(|(date, pnl)| {
            running_total += pnl;
            CumulativePoint {
                date: date.to_string(),
                value: running_total.round_dp(DISPLAY_DECIMAL_PRECISION),
            }
        })
        .collect()
}

/// Orders a daily map chronologically. The invalid-date bucket is dropped.
pub fn compute_daily_pnl_series(daily: &DailyPnl) -> Vec<DailyPnlPoint> {
    let mut series: Vec<DailyPnlPoint> = daily
        .iter()
        .filter_map(|(key, entry)| {
            NaiveDate::parse_from_str(key, DAILY_KEY_FORMAT)
                .ok()
                .map(|date| DailyPnlPoint {
                    date,
                    pnl: entry.pnl,
                    trade_count: entry.trade_count,
                })
        })
        .collect();
    series.sort_by_key(|p| p.date);
    series
}

/// Summarizes a daily map.
///
/// Totals include every bucket. Day statistics only count days that have
/// trades and a valid date, so the empty-ledger placeholder never shows up as
/// a best or worst day.
pub fn summarize_daily_pnl(daily: &DailyPnl) -> PnlSummary {
    let mut summary = PnlSummary {
        undated_trades: daily
            .get(INVALID_DATE_KEY)
            .map(|e| e.trade_count)
            .unwrap_or(0),
        ..Default::default()
    };

    for entry in daily.values() {
        summary.total_pnl += entry.pnl;
        summary.total_trades += entry.trade_count;
    }

    for point in compute_daily_pnl_series(daily)
        .into_iter()
        .filter(|p| p.trade_count > 0)
    {
        summary.trading_days += 1;
        if point.pnl > Decimal::ZERO {
            summary.winning_days += 1;
        } else if point.pnl < Decimal::ZERO {
            summary.losing_days += 1;
        }
        if summary.best_day.as_ref().map_or(true, |best| point.pnl > best.pnl) {
            summary.best_day = Some(point.clone());
        }
        if summary.worst_day.as_ref().map_or(true, |worst| point.pnl < worst.pnl) {
            summary.worst_day = Some(point);
        }
    }

    summary.total_pnl = summary.total_pnl.round_dp(DISPLAY_DECIMAL_PRECISION);
    summary
}
