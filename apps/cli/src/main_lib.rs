use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use tradejournal_core::{
    pnl::{PnlService, PnlServiceTrait},
    trades::{TradeService, TradeServiceTrait},
    utils::time_utils::SystemClock,
};
use tradejournal_storage_sqlite::{db, trades::TradeRepository};

use crate::config::Config;

pub struct AppState {
    pub trade_service: Arc<dyn TradeServiceTrait>,
    pub pnl_service: Arc<dyn PnlServiceTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("TJ_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays machine readable.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let db_path = db::init(&config.db_path)?;
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    tracing::debug!("Journal database ready at {}", db_path);

    let trade_repository = Arc::new(TradeRepository::new(pool));
    let trade_service: Arc<dyn TradeServiceTrait> =
        Arc::new(TradeService::new(trade_repository.clone(), config.timezone));
    let pnl_service: Arc<dyn PnlServiceTrait> = Arc::new(PnlService::new(
        trade_repository,
        Arc::new(SystemClock),
        config.timezone,
    ));

    Ok(AppState {
        trade_service,
        pnl_service,
    })
}
