use super::trades_model::{ImportTradesSummary, NewTrade, Trade, TradeFilter, TradeRecord};
use super::csv_import::CsvImportConfig;
use crate::Result;

/// Trait defining the contract for Trade repository operations.
pub trait TradeRepositoryTrait: Send + Sync {
    fn get_trades(&self) -> Result<Vec<Trade>>;
    fn search_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>>;
    /// Inserts all trades in one transaction and returns them as stored.
    fn insert_trades(&self, trades: Vec<NewTrade>) -> Result<Vec<Trade>>;
    fn delete_trade(&self, trade_id: &str) -> Result<Trade>;
}

/// Trait defining the contract for Trade service operations.
pub trait TradeServiceTrait: Send + Sync {
    fn get_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>>;
    fn record_trade(&self, record: TradeRecord) -> Result<Trade>;
    fn import_records(&self, records: Vec<TradeRecord>) -> Result<ImportTradesSummary>;
    fn import_csv(&self, content: &str, config: &CsvImportConfig) -> Result<ImportTradesSummary>;
    fn delete_trade(&self, trade_id: &str) -> Result<Trade>;
}
