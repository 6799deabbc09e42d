//! Trade file parsing.
//!
//! Reads broker statements and journal exports into [`FileTradeRow`]s. Columns
//! are located by header name, so the column order does not matter.

use csv::{ReaderBuilder, StringRecord, Terminator};
use serde::{Deserialize, Serialize};

use super::trades_model::{FileTradeRow, ImportRowError};
use crate::errors::{Error, ValidationError};
use crate::Result;

const DATE_HEADERS: &[&str] = &["date", "trade_date", "tradedate", "close_date", "close time", "closed_at"];
const PROFIT_HEADERS: &[&str] = &["profit", "pnl", "p&l", "net_profit", "realized_pnl"];
const COMMISSION_HEADERS: &[&str] = &["commission", "commissions", "fee", "fees"];
const SWAP_HEADERS: &[&str] = &["swap", "swaps", "rollover", "financing"];
const SYMBOL_HEADERS: &[&str] = &["symbol", "ticker", "instrument", "item"];
const ACCOUNT_HEADERS: &[&str] = &["account", "account_id", "accountid"];

/// Configuration for trade file imports.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CsvImportConfig {
    /// Account used for rows without an account column (or with an empty cell)
    pub default_account_id: Option<String>,
    /// Delimiter character: ",", ";", "\t", or "auto" (default: "auto")
    pub delimiter: Option<String>,
}

impl CsvImportConfig {
    pub fn for_account(account_id: impl Into<String>) -> Self {
        CsvImportConfig {
            default_account_id: Some(account_id.into()),
            delimiter: None,
        }
    }

    /// Returns the effective delimiter, defaulting to "auto"
    pub fn effective_delimiter(&self) -> &str {
        self.delimiter.as_deref().unwrap_or("auto")
    }
}

/// Rows read from a trade file, each tagged with its 1-based line number.
#[derive(Debug, Clone, Default)]
pub struct ParsedTradeFile {
    pub rows: Vec<(usize, FileTradeRow)>,
    pub errors: Vec<ImportRowError>,
    pub delimiter: u8,
}

#[derive(Debug)]
struct ColumnMap {
    date: usize,
    profit: usize,
    commission: Option<usize>,
    swap: Option<usize>,
    symbol: Option<usize>,
    account: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |aliases: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim().to_lowercase();
                aliases.iter().any(|alias| *alias == h)
            })
        };
        let date = find(DATE_HEADERS).ok_or_else(|| missing_column("date"))?;
        let profit = find(PROFIT_HEADERS).ok_or_else(|| missing_column("profit"))?;
        Ok(ColumnMap {
            date,
            profit,
            commission: find(COMMISSION_HEADERS),
            swap: find(SWAP_HEADERS),
            symbol: find(SYMBOL_HEADERS),
            account: find(ACCOUNT_HEADERS),
        })
    }
}

fn missing_column(name: &str) -> Error {
    Error::Validation(ValidationError::MissingField(format!("{} column", name)))
}

fn cell(record: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Picks the delimiter that splits the first lines into the most consistent columns.
fn detect_delimiter(content: &str, config: &CsvImportConfig) -> Result<u8> {
    match config.effective_delimiter() {
        "auto" => {}
        "\\t" | "\t" => return Ok(b'\t'),
        other => {
            return match other.as_bytes() {
                [single] => Ok(*single),
                _ => Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "delimiter must be a single character, got '{}'",
                    other
                )))),
            }
        }
    }

    let lines: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    let score = |delimiter: char| {
        let counts: Vec<usize> = lines.iter().map(|l| l.matches(delimiter).count()).collect();
        match counts.first() {
            Some(&first) if first > 0 => first * counts.iter().filter(|&&c| c == first).count(),
            _ => 0,
        }
    };

    Ok([b',', b';', b'\t']
        .into_iter()
        .max_by_key(|d| (score(*d as char), *d == b','))
        .unwrap_or(b','))
}

/// Parses trade file content into rows.
///
/// Structural problems (no header, missing date/profit columns) fail the
/// whole file. Problems confined to one row are reported in `errors` and the
/// row is skipped.
pub fn parse_trades_csv(content: &str, config: &CsvImportConfig) -> Result<ParsedTradeFile> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let delimiter = detect_delimiter(content, config)?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(Error::Import(
            "Trade file is empty or has no header row".to_string(),
        ));
    }
    let columns = ColumnMap::from_headers(&headers)?;
    let default_account = config
        .default_account_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let mut parsed = ParsedTradeFile {
        delimiter,
        ..Default::default()
    };

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line_number = e.position().map(|p| p.line() as usize).unwrap_or(0);
                parsed.errors.push(ImportRowError {
                    line_number,
                    message: format!("Failed to read row: {}", e),
                });
                continue;
            }
        };
        let line_number = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(parsed.rows.len() + 2);

        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let account_id = match cell(&record, columns.account).or(default_account.map(String::from)) {
            Some(account_id) => account_id,
            None => {
                parsed.errors.push(ImportRowError {
                    line_number,
                    message: "Row has no account and no default account was given".to_string(),
                });
                continue;
            }
        };

        parsed.rows.push((
            line_number,
            FileTradeRow {
                account_id,
                symbol: cell(&record, columns.symbol),
                date: cell(&record, Some(columns.date)).unwrap_or_default(),
                profit: cell(&record, Some(columns.profit)).unwrap_or_default(),
                commission: cell(&record, columns.commission),
                swap: cell(&record, columns.swap),
            },
        ));
    }

    log::debug!(
        "Parsed {} trade rows ({} row errors) with delimiter {:?}",
        parsed.rows.len(),
        parsed.errors.len(),
        delimiter as char
    );
    Ok(parsed)
}
