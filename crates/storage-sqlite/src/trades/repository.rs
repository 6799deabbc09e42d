use std::sync::Arc;

use diesel::prelude::*;
use log::debug;

use tradejournal_core::constants::ISO_DAY_FORMAT;
use tradejournal_core::trades::{NewTrade, Trade, TradeFilter, TradeRepositoryTrait};
use tradejournal_core::Result;

use super::model::TradeDB;
use crate::db::{get_connection, DbPool};
use crate::errors::{IntoCore, StorageError};
use crate::schema::trades;
use crate::schema::trades::dsl::*;

fn into_trades(rows: Vec<TradeDB>) -> Result<Vec<Trade>> {
    rows.into_iter().map(Trade::try_from).collect()
}

/// Repository for trades stored in SQLite.
pub struct TradeRepository {
    pool: Arc<DbPool>,
}

impl TradeRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        TradeRepository { pool }
    }
}

impl TradeRepositoryTrait for TradeRepository {
    fn get_trades(&self) -> Result<Vec<Trade>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = trades
            .order((trade_date.asc(), created_at.asc()))
            .select(TradeDB::as_select())
            .load::<TradeDB>(&mut conn)
            .into_core()?;
        into_trades(rows)
    }

    fn search_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = trades::table.into_boxed();

        if let Some(account) = &filter.account_id {
            query = query.filter(account_id.eq(account.clone()));
        }
        // ISO days compare correctly as text.
        if let Some(start) = filter.start_date {
            query = query.filter(trade_date.ge(start.format(ISO_DAY_FORMAT).to_string()));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(trade_date.le(end.format(ISO_DAY_FORMAT).to_string()));
        }

        let rows = query
            .order((trade_date.asc(), created_at.asc()))
            .select(TradeDB::as_select())
            .load::<TradeDB>(&mut conn)
            .into_core()?;
        debug!("Trade search {:?} matched {} rows", filter, rows.len());
        into_trades(rows)
    }

    /// Re-inserting a trade with an existing id (a broker re-sync) replaces the stored row.
    fn insert_trades(&self, new_trades: Vec<NewTrade>) -> Result<Vec<Trade>> {
        let rows: Vec<TradeDB> = new_trades.into_iter().map(TradeDB::from).collect();
        let mut conn = get_connection(&self.pool)?;

        conn.immediate_transaction::<_, StorageError, _>(|c| {
            for row in &rows {
                diesel::replace_into(trades::table).values(row).execute(c)?;
            }
            Ok(())
        })?;

        into_trades(rows)
    }

    fn delete_trade(&self, trade_id: &str) -> Result<Trade> {
        let mut conn = get_connection(&self.pool)?;

        let deleted = conn.immediate_transaction::<_, StorageError, _>(|c| {
            let existing = trades
                .find(trade_id)
                .select(TradeDB::as_select())
                .first::<TradeDB>(c)?;
            diesel::delete(trades.find(trade_id)).execute(c)?;
            Ok(existing)
        })?;

        Trade::try_from(deleted)
    }
}
