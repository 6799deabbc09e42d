mod config;
mod main_lib;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;

use config::Config;
use main_lib::{build_state, init_tracing, AppState};
use tradejournal_core::pnl::PnlMode;
use tradejournal_core::trades::{CsvImportConfig, ManualTradeInput, TradeFilter, TradeRecord};

#[derive(Parser)]
#[command(name = "tradejournal")]
#[command(about = "Trading journal with daily and cumulative P&L", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import trades from a CSV file or a JSON array of trade records
    Import {
        /// Path to the file
        #[arg(long)]
        file: PathBuf,

        /// Account for rows without an account column
        #[arg(long)]
        account: Option<String>,

        /// CSV delimiter: ",", ";", "\t" or "auto"
        #[arg(long)]
        delimiter: Option<String>,

        /// Treat the file as JSON trade records instead of CSV
        #[arg(long)]
        json: bool,
    },

    /// Record a single trade by hand
    Add {
        #[arg(long)]
        account: String,

        /// Trade day, e.g. 2024-01-31
        #[arg(long)]
        date: String,

        #[arg(long, allow_hyphen_values = true)]
        profit: Decimal,

        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        commission: Decimal,

        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        swap: Decimal,

        #[arg(long)]
        symbol: Option<String>,
    },

    /// Delete a trade by id
    Delete {
        #[arg(long)]
        id: String,
    },

    /// List stored trades
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Daily P&L keyed by DD-MM-YYYY
    Daily {
        #[command(flatten)]
        filter: FilterArgs,

        /// NET or GROSS (defaults to TJ_DEFAULT_PNL_MODE)
        #[arg(long)]
        mode: Option<PnlMode>,

        /// Print a chronological series instead of the keyed map
        #[arg(long)]
        series: bool,
    },

    /// Running gross P&L per trade day
    Cumulative {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Daily, cumulative and summary figures in one document
    Report {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long)]
        mode: Option<PnlMode>,
    },
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    account: Option<String>,

    /// First trade day to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last trade day to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl From<FilterArgs> for TradeFilter {
    fn from(args: FilterArgs) -> Self {
        TradeFilter {
            account_id: args.account,
            start_date: args.from,
            end_date: args.to,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(command: Commands, config: &Config, state: &AppState) -> Result<()> {
    match command {
        Commands::Import {
            file,
            account,
            delimiter,
            json,
        } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let summary = if json {
                let records: Vec<TradeRecord> = serde_json::from_str(&content)
                    .with_context(|| format!("Invalid trade records in {}", file.display()))?;
                state.trade_service.import_records(records)?
            } else {
                let import_config = CsvImportConfig {
                    default_account_id: account,
                    delimiter,
                };
                state.trade_service.import_csv(&content, &import_config)?
            };
            tracing::info!(
                "Imported {} trades from {} ({} rows rejected)",
                summary.imported_count(),
                file.display(),
                summary.errors.len()
            );
            print_json(&summary)
        }
        Commands::Add {
            account,
            date,
            profit,
            commission,
            swap,
            symbol,
        } => {
            let trade = state
                .trade_service
                .record_trade(TradeRecord::Manual(ManualTradeInput {
                    account_id: account,
                    symbol,
                    date,
                    profit,
                    commission,
                    swap,
                }))?;
            print_json(&trade)
        }
        Commands::Delete { id } => print_json(&state.trade_service.delete_trade(&id)?),
        Commands::List { filter } => {
            print_json(&state.trade_service.get_trades(&filter.into())?)
        }
        Commands::Daily {
            filter,
            mode,
            series,
        } => {
            let mode = mode.unwrap_or(config.default_pnl_mode);
            let filter = filter.into();
            if series {
                print_json(&state.pnl_service.get_daily_pnl_series(&filter, mode)?)
            } else {
                print_json(&state.pnl_service.get_daily_pnl(&filter, mode)?)
            }
        }
        Commands::Cumulative { filter } => {
            print_json(&state.pnl_service.get_cumulative_pnl(&filter.into())?)
        }
        Commands::Report { filter, mode } => {
            let mode = mode.unwrap_or(config.default_pnl_mode);
            print_json(&state.pnl_service.get_pnl_report(&filter.into(), mode)?)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing();
    let state = build_state(&config)?;
    run(cli.command, &config, &state)
}
