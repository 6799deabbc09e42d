use std::sync::Arc;

use chrono_tz::Tz;
use log::debug;

use super::pnl_calculator::{
    compute_cumulative_pnl, compute_daily_pnl, compute_daily_pnl_series, summarize_daily_pnl,
};
use super::pnl_model::{CumulativePoint, DailyPnl, DailyPnlPoint, PnlMode, PnlReport};
use crate::trades::{Trade, TradeFilter, TradeRepositoryTrait};
use crate::utils::time_utils::Clock;
use crate::Result;

pub trait PnlServiceTrait: Send + Sync {
    fn get_daily_pnl(&self, filter: &TradeFilter, mode: PnlMode) -> Result<DailyPnl>;
    fn get_daily_pnl_series(&self, filter: &TradeFilter, mode: PnlMode)
        -> Result<Vec<DailyPnlPoint>>;
    fn get_cumulative_pnl(&self, filter: &TradeFilter) -> Result<Vec<CumulativePoint>>;
    fn get_pnl_report(&self, filter: &TradeFilter, mode: PnlMode) -> Result<PnlReport>;
}

/// Loads trade snapshots from the repository and runs the P&L aggregations on them.
pub struct PnlService {
    trade_repository: Arc<dyn TradeRepositoryTrait>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl PnlService {
    pub fn new(
        trade_repository: Arc<dyn TradeRepositoryTrait>,
        clock: Arc<dyn Clock>,
        timezone: Tz,
    ) -> Self {
        PnlService {
            trade_repository,
            clock,
            timezone,
        }
    }

    fn load_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>> {
        let trades = if filter == &TradeFilter::default() {
            self.trade_repository.get_trades()?
        } else {
            self.trade_repository.search_trades(filter)?
        };
        debug!("Loaded {} trades for P&L ({:?})", trades.len(), filter);
        Ok(trades)
    }
}

impl PnlServiceTrait for PnlService {
    fn get_daily_pnl(&self, filter: &TradeFilter, mode: PnlMode) -> Result<DailyPnl> {
        let trades = self.load_trades(filter)?;
        Ok(compute_daily_pnl(
            &trades,
            mode,
            self.clock.as_ref(),
            self.timezone,
        ))
    }

    fn get_daily_pnl_series(
        &self,
        filter: &TradeFilter,
        mode: PnlMode,
    ) -> Result<Vec<DailyPnlPoint>> {
        let daily = self.get_daily_pnl(filter, mode)?;
        Ok(compute_daily_pnl_series(&daily))
    }

    fn get_cumulative_pnl(&self, filter: &TradeFilter) -> Result<Vec<CumulativePoint>> {
        let trades = self.load_trades(filter)?;
        Ok(compute_cumulative_pnl(&trades))
    }

    fn get_pnl_report(&self, filter: &TradeFilter, mode: PnlMode) -> Result<PnlReport> {
        // One snapshot feeds every figure so they always agree with each other.
        let trades = self.load_trades(filter)?;
        let daily = compute_daily_pnl(&trades, mode, self.clock.as_ref(), self.timezone);
        let daily_series = compute_daily_pnl_series(&daily);
        let summary = summarize_daily_pnl(&daily);
        let cumulative = compute_cumulative_pnl(&trades);

        Ok(PnlReport {
            mode,
            daily,
            daily_series,
            cumulative,
            summary,
        })
    }
}
