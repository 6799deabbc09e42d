//! Database models for trades.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tradejournal_core::errors::Error;
use tradejournal_core::trades::{parse_decimal_field, NewTrade, Trade, TradeSource};

/// Database model for trades.
///
/// Amounts are stored as TEXT so no precision is lost on the way through SQLite.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::trades)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TradeDB {
    pub id: String,
    pub account_id: String,
    pub symbol: Option<String>,
    pub source: String,
    pub trade_date: String,
    pub profit: String,
    pub commission: String,
    pub swap: String,
    pub created_at: NaiveDateTime,
}

impl From<NewTrade> for TradeDB {
    fn from(new_trade: NewTrade) -> Self {
        let trade_date = new_trade.iso_date();
        Self {
            id: new_trade
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            account_id: new_trade.account_id,
            symbol: new_trade.symbol,
            source: new_trade.source.as_str().to_string(),
            trade_date,
            profit: new_trade.profit.to_string(),
            commission: new_trade.commission.to_string(),
            swap: new_trade.swap.to_string(),
            created_at: Utc::now().naive_utc(),
        }
    }
}

// Rows can be written by other tools, so reading them back is fallible.
impl TryFrom<TradeDB> for Trade {
    type Error = Error;

    fn try_from(db: TradeDB) -> Result<Self, Self::Error> {
        Ok(Self {
            profit: parse_decimal_field("profit", &db.profit)?,
            commission: parse_decimal_field("commission", &db.commission)?,
            swap: parse_decimal_field("swap", &db.swap)?,
            source: db.source.parse::<TradeSource>()?,
            id: db.id,
            account_id: db.account_id,
            symbol: db.symbol,
            date: db.trade_date,
            created_at: db.created_at.and_utc(),
        })
    }
}
