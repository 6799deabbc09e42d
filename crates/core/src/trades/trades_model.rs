//! Trade domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{ISO_DAY_FORMAT, MAX_TRADE_AMOUNT};
use crate::errors::{Error, Result, ValidationError};
use crate::utils::time_utils::parse_trade_day;

/// Parses a monetary field strictly.
///
/// Plain and scientific notation are accepted. Anything else, or a magnitude
/// above [`MAX_TRADE_AMOUNT`], is a `MalformedRecord`; there is no silent
/// fallback to zero.
pub fn parse_decimal_field(field_name: &str, value_str: &str) -> Result<Decimal> {
    let trimmed = value_str.trim();
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| Error::malformed(field_name, value_str, e.to_string()))?;
    check_amount(field_name, value)
}

fn check_amount(field_name: &str, value: Decimal) -> Result<Decimal> {
    if value.abs() > MAX_TRADE_AMOUNT {
        return Err(Error::malformed(
            field_name,
            value.to_string(),
            format!("magnitude exceeds {}", MAX_TRADE_AMOUNT),
        ));
    }
    Ok(value)
}

/// Like [`parse_decimal_field`], but an empty cell means zero.
pub fn parse_optional_decimal_field(field_name: &str, value_str: Option<&str>) -> Result<Decimal> {
    match value_str.map(str::trim) {
        None | Some("") => Ok(Decimal::ZERO),
        Some(value) => parse_decimal_field(field_name, value),
    }
}

fn decimal_from_json(field_name: &str, value: &Value, required: bool) -> Result<Decimal> {
    match value {
        Value::Number(n) => parse_decimal_field(field_name, &n.to_string()),
        Value::String(s) if !required && s.trim().is_empty() => Ok(Decimal::ZERO),
        Value::String(s) => parse_decimal_field(field_name, s),
        Value::Null if !required => Ok(Decimal::ZERO),
        other => Err(Error::malformed(
            field_name,
            other.to_string(),
            "expected a number or numeric string",
        )),
    }
}

fn normalize_day(raw: &str, tz: Tz) -> Result<NaiveDate> {
    parse_trade_day(raw, tz)
        .ok_or_else(|| Error::malformed("date", raw, "unrecognized date format"))
}

fn require_account(account_id: &str) -> Result<String> {
    let trimmed = account_id.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "accountId".to_string(),
        )));
    }
    Ok(trimmed.to_string())
}

fn clean_symbol(symbol: Option<String>) -> Option<String> {
    symbol
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
}

/// Where a trade entered the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSource {
    #[default]
    Manual,
    BrokerSync,
    FileUpload,
}

impl TradeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSource::Manual => "MANUAL",
            TradeSource::BrokerSync => "BROKER_SYNC",
            TradeSource::FileUpload => "FILE_UPLOAD",
        }
    }
}

impl fmt::Display for TradeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MANUAL" => Ok(TradeSource::Manual),
            "BROKER_SYNC" => Ok(TradeSource::BrokerSync),
            "FILE_UPLOAD" => Ok(TradeSource::FileUpload),
            other => Err(Error::malformed("source", other, "unknown trade source")),
        }
    }
}

/// Normalized trade, as stored and as consumed by the P&L aggregator.
///
/// `commission` keeps whatever sign the source reported. Gross figures use it
/// as stored; net figures always treat it as a cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub account_id: String,
    pub symbol: Option<String>,
    pub source: TradeSource,
    /// Calendar day. Normalized trades carry `YYYY-MM-DD`.
    pub date: String,
    pub profit: Decimal,
    pub commission: Decimal,
    pub swap: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Trade {
    /// `profit + commission + swap`, commission taken with its stored sign.
    pub fn gross_pnl(&self) -> Decimal {
        self.profit + self.commission + self.swap
    }

    /// `profit + swap - |commission|`.
    pub fn net_pnl(&self) -> Decimal {
        self.profit + self.swap - self.commission.abs()
    }
}

/// Validated trade ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrade {
    /// Stable identifier supplied by the source (broker trade id); generated when absent.
    pub id: Option<String>,
    pub account_id: String,
    pub symbol: Option<String>,
    pub source: TradeSource,
    pub date: NaiveDate,
    pub profit: Decimal,
    pub commission: Decimal,
    pub swap: Decimal,
}

impl NewTrade {
    pub fn iso_date(&self) -> String {
        self.date.format(ISO_DAY_FORMAT).to_string()
    }
}

/// Trade typed into the journal by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualTradeInput {
    pub account_id: String,
    pub symbol: Option<String>,
    pub date: String,
    pub profit: Decimal,
    #[serde(default)]
    pub commission: Decimal,
    #[serde(default)]
    pub swap: Decimal,
}

/// Closed trade as delivered by a broker sync.
///
/// Brokers send amounts as JSON numbers or numeric strings and report the
/// fee as a positive magnitude.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerTradeRecord {
    pub account_id: String,
    pub broker_trade_id: String,
    pub symbol: Option<String>,
    pub closed_at: String,
    pub profit: Value,
    #[serde(default)]
    pub fee: Value,
    #[serde(default)]
    pub swap: Value,
}

/// One row of an uploaded trade file, every cell still text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTradeRow {
    pub account_id: String,
    pub symbol: Option<String>,
    pub date: String,
    pub profit: String,
    pub commission: Option<String>,
    pub swap: Option<String>,
}

/// A trade record tagged by the source it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeRecord {
    Manual(ManualTradeInput),
    BrokerSync(BrokerTradeRecord),
    FileUpload(FileTradeRow),
}

impl TradeRecord {
    pub fn source(&self) -> TradeSource {
        match self {
            TradeRecord::Manual(_) => TradeSource::Manual,
            TradeRecord::BrokerSync(_) => TradeSource::BrokerSync,
            TradeRecord::FileUpload(_) => TradeSource::FileUpload,
        }
    }

    /// Validates the record and projects it onto the common trade shape.
    ///
    /// Dates are resolved to a calendar day in `tz`. Amounts that are not
    /// numbers fail with `MalformedRecord`.
    pub fn normalize(self, tz: Tz) -> Result<NewTrade> {
        let source = self.source();
        match self {
            TradeRecord::Manual(input) => Ok(NewTrade {
                id: None,
                account_id: require_account(&input.account_id)?,
                symbol: clean_symbol(input.symbol),
                source,
                date: normalize_day(&input.date, tz)?,
                profit: check_amount("profit", input.profit)?,
                commission: check_amount("commission", input.commission)?,
                swap: check_amount("swap", input.swap)?,
            }),
            TradeRecord::BrokerSync(record) => {
                let broker_trade_id = record.broker_trade_id.trim();
                if broker_trade_id.is_empty() {
                    return Err(Error::Validation(ValidationError::MissingField(
                        "brokerTradeId".to_string(),
                    )));
                }
                let fee = decimal_from_json("fee", &record.fee, false)?;
                Ok(NewTrade {
                    id: Some(broker_trade_id.to_string()),
                    account_id: require_account(&record.account_id)?,
                    symbol: clean_symbol(record.symbol),
                    source,
                    date: normalize_day(&record.closed_at, tz)?,
                    profit: decimal_from_json("profit", &record.profit, true)?,
                    commission: -fee.abs(),
                    swap: decimal_from_json("swap", &record.swap, false)?,
                })
            }
            TradeRecord::FileUpload(row) => Ok(NewTrade {
                id: None,
                account_id: require_account(&row.account_id)?,
                symbol: clean_symbol(row.symbol),
                source,
                date: normalize_day(&row.date, tz)?,
                profit: parse_decimal_field("profit", &row.profit)?,
                commission: parse_optional_decimal_field("commission", row.commission.as_deref())?,
                swap: parse_optional_decimal_field("swap", row.swap.as_deref())?,
            }),
        }
    }
}

/// Narrows which trades a query returns. Empty filter means all trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeFilter {
    pub account_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TradeFilter {
    pub fn for_account(account_id: impl Into<String>) -> Self {
        TradeFilter {
            account_id: Some(account_id.into()),
            ..Default::default()
        }
    }

    /// True if the trade passes every bound that is set.
    ///
    /// Date bounds are inclusive and compared on the ISO day string, so a trade
    /// whose date is not `YYYY-MM-DD` never matches a date-bounded filter.
    #[cfg(test)]
    pub(crate) fn matches(&self, trade: &Trade) -> bool {
        if let Some(account_id) = &self.account_id {
            if &trade.account_id != account_id {
                return false;
            }
        }
        if self.start_date.is_none() && self.end_date.is_none() {
            return true;
        }
        let Ok(day) = NaiveDate::parse_from_str(&trade.date, ISO_DAY_FORMAT) else {
            return false;
        };
        self.start_date.map_or(true, |start| day >= start)
            && self.end_date.map_or(true, |end| day <= end)
    }
}

/// A record that could not be imported, with its position in the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRowError {
    /// 1-based line number in the source file, or 1-based index for in-memory batches.
    pub line_number: usize,
    pub message: String,
}

/// Outcome of importing a batch of trade records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportTradesSummary {
    pub imported: Vec<Trade>,
    pub errors: Vec<ImportRowError>,
}

impl ImportTradesSummary {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
