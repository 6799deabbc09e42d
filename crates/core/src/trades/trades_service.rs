use std::sync::Arc;

use chrono_tz::Tz;
use log::{debug, warn};

use super::csv_import::{parse_trades_csv, CsvImportConfig};
use super::trades_model::{
    ImportRowError, ImportTradesSummary, NewTrade, Trade, TradeFilter, TradeRecord,
};
use super::trades_traits::{TradeRepositoryTrait, TradeServiceTrait};
use crate::errors::{Error, Result};

/// Service for recording and importing trades.
pub struct TradeService {
    repository: Arc<dyn TradeRepositoryTrait>,
    timezone: Tz,
}

impl TradeService {
    pub fn new(repository: Arc<dyn TradeRepositoryTrait>, timezone: Tz) -> Self {
        TradeService {
            repository,
            timezone,
        }
    }

    /// Normalizes every record, keeping the good ones and collecting the bad.
    fn normalize_batch(
        &self,
        records: impl IntoIterator<Item = (usize, TradeRecord)>,
    ) -> (Vec<NewTrade>, Vec<ImportRowError>) {
        let mut valid = Vec::new();
        let mut errors = Vec::new();
        for (line_number, record) in records {
            match record.normalize(self.timezone) {
                Ok(trade) => valid.push(trade),
                Err(e) => {
                    warn!("Skipping trade record at line {}: {}", line_number, e);
                    errors.push(ImportRowError {
                        line_number,
                        message: e.to_string(),
                    });
                }
            }
        }
        (valid, errors)
    }

    fn persist(&self, trades: Vec<NewTrade>, errors: Vec<ImportRowError>) -> Result<ImportTradesSummary> {
        let imported = if trades.is_empty() {
            Vec::new()
        } else {
            self.repository.insert_trades(trades)?
        };
        debug!(
            "Imported {} trades, rejected {} records",
            imported.len(),
            errors.len()
        );
        Ok(ImportTradesSummary { imported, errors })
    }
}

impl TradeServiceTrait for TradeService {
    fn get_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>> {
        if filter == &TradeFilter::default() {
            self.repository.get_trades()
        } else {
            self.repository.search_trades(filter)
        }
    }

    fn record_trade(&self, record: TradeRecord) -> Result<Trade> {
        let new_trade = record.normalize(self.timezone)?;
        self.repository
            .insert_trades(vec![new_trade])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Repository("Insert returned no trade".to_string()))
    }

    fn import_records(&self, records: Vec<TradeRecord>) -> Result<ImportTradesSummary> {
        let numbered = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| (i + 1, record));
        let (valid, errors) = self.normalize_batch(numbered);
        self.persist(valid, errors)
    }

    fn import_csv(&self, content: &str, config: &CsvImportConfig) -> Result<ImportTradesSummary> {
        let parsed = parse_trades_csv(content, config)?;
        let (valid, mut errors) = self.normalize_batch(
            parsed
                .rows
                .into_iter()
                .map(|(line, row)| (line, TradeRecord::FileUpload(row))),
        );
        errors.extend(parsed.errors);
        errors.sort_by_key(|e| e.line_number);
        self.persist(valid, errors)
    }

    fn delete_trade(&self, trade_id: &str) -> Result<Trade> {
        self.repository.delete_trade(trade_id)
    }
}
