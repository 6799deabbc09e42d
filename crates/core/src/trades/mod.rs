//! Trades module - domain models, ingestion, services, and traits.

mod csv_import;
mod trades_model;
mod trades_service;
mod trades_traits;

#[cfg(test)]
mod trades_model_tests;


pub use csv_import::{parse_trades_csv, CsvImportConfig, ParsedTradeFile};
pub use trades_model::{
    parse_decimal_field, parse_optional_decimal_field, BrokerTradeRecord, FileTradeRow,
    ImportRowError, ImportTradesSummary, ManualTradeInput, NewTrade, Trade, TradeFilter,
    TradeRecord, TradeSource,
};
pub use trades_service::TradeService;
pub use trades_traits::{TradeRepositoryTrait, TradeServiceTrait};
