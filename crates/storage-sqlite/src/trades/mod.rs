//! SQLite storage implementation for trades.

mod model;
mod repository;

pub use model::TradeDB;
pub use repository::TradeRepository;
