//! Tests for the P&L service.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::errors::{DatabaseError, Error, Result};
    use crate::pnl::*;
    use crate::trades::{NewTrade, Trade, TradeFilter, TradeRepositoryTrait, TradeSource};
    use crate::utils::time_utils::FixedClock;

    struct MockTradeRepository {
        trades: Vec<Trade>,
    }

    impl TradeRepositoryTrait for MockTradeRepository {
        fn get_trades(&self) -> Result<Vec<Trade>> {
            Ok(self.trades.clone())
        }

        fn search_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>> {
            Ok(self
                .trades
                .iter()
                .filter(|t| filter.matches(t))
                .cloned()
                .collect())
        }

        fn insert_trades(&self, _trades: Vec<NewTrade>) -> Result<Vec<Trade>> {
            unimplemented!("read-only mock")
        }

        fn delete_trade(&self, _trade_id: &str) -> Result<Trade> {
            unimplemented!("read-only mock")
        }
    }

    struct FailingTradeRepository;

    impl TradeRepositoryTrait for FailingTradeRepository {
        fn get_trades(&self) -> Result<Vec<Trade>> {
            Err(Error::Database(DatabaseError::QueryFailed("disk I/O error".to_string())))
        }

        fn search_trades(&self, _filter: &TradeFilter) -> Result<Vec<Trade>> {
            self.get_trades()
        }

        fn insert_trades(&self, _trades: Vec<NewTrade>) -> Result<Vec<Trade>> {
            self.get_trades()
        }

        fn delete_trade(&self, _trade_id: &str) -> Result<Trade> {
            Err(Error::Database(DatabaseError::NotFound("trade".to_string())))
        }
    }

    fn trade(account: &str, date: &str, profit: Decimal, commission: Decimal) -> Trade {
        Trade {
            id: format!("{}-{}-{}", account, date, profit),
            account_id: account.to_string(),
            symbol: Some("EURUSD".to_string()),
            source: TradeSource::FileUpload,
            date: date.to_string(),
            profit,
            commission,
            swap: dec!(0),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn service_with(trades: Vec<Trade>) -> PnlService {
        PnlService::new(
            Arc::new(MockTradeRepository { trades }),
            Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap())),
            chrono_tz::UTC,
        )
    }

    fn ledger() -> Vec<Trade> {
        vec![
            trade("acc-1", "2024-01-01", dec!(100), dec!(5)),
            trade("acc-1", "2024-01-01", dec!(-20), dec!(2)),
            trade("acc-1", "2024-01-02", dec!(50), dec!(0)),
            trade("acc-2", "2024-01-02", dec!(10), dec!(-1)),
        ]
    }

    #[test]
    fn test_daily_pnl_for_account() {
        let service = service_with(ledger());
        let daily = service
            .get_daily_pnl(&TradeFilter::for_account("acc-1"), PnlMode::Net)
            .unwrap();

        assert_eq!(daily["01-01-2024"].pnl, dec!(73));
        assert_eq!(daily["02-01-2024"].trade_count, 1);
    }

    #[test]
    fn test_daily_pnl_for_unknown_account_returns_placeholder() {
        let service = service_with(ledger());
        let daily = service
            .get_daily_pnl(&TradeFilter::for_account("nobody"), PnlMode::Gross)
            .unwrap();

        assert_eq!(daily.len(), 1);
        assert_eq!(daily["01-08-2024"], DailyPnlEntry::default());
    }

    #[test]
    fn test_cumulative_pnl_across_accounts() {
        let service = service_with(ledger());
        let series = service.get_cumulative_pnl(&TradeFilter::default()).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].value, dec!(87));
        assert_eq!(series[1].value, dec!(146));
    }

    #[test]
    fn test_cumulative_pnl_honours_date_range() {
        let service = service_with(ledger());
        let filter = TradeFilter {
            account_id: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 2),
            end_date: None,
        };
        let series = service.get_cumulative_pnl(&filter).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, "2024-01-02");
        assert_eq!(series[0].value, dec!(59));
    }

    #[test]
    fn test_daily_series_is_ordered() {
        let service = service_with(ledger());
        let series = service
            .get_daily_pnl_series(&TradeFilter::default(), PnlMode::Gross)
            .unwrap();

        assert_eq!(series.len(), 2);
        assert!(series[0].date < series[1].date);
        assert_eq!(series[1].pnl, dec!(59));
        assert_eq!(series[1].trade_count, 2);
    }

    #[test]
    fn test_report_figures_agree() {
        let service = service_with(ledger());
        let report = service
            .get_pnl_report(&TradeFilter::default(), PnlMode::Gross)
            .unwrap();

        assert_eq!(report.mode, PnlMode::Gross);
        assert_eq!(report.daily.len(), 2);
        assert_eq!(report.daily_series.len(), 2);
        assert_eq!(report.summary.total_trades, 4);
        // In gross mode the last cumulative point equals the summed daily P&L.
        assert_eq!(
            report.cumulative.last().map(|p| p.value),
            Some(report.summary.total_pnl)
        );
    }

    #[test]
    fn test_repository_errors_propagate() {
        let service = PnlService::new(
            Arc::new(FailingTradeRepository),
            Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap())),
            chrono_tz::UTC,
        );
        assert!(matches!(
            service.get_pnl_report(&TradeFilter::default(), PnlMode::Net),
            Err(Error::Database(DatabaseError::QueryFailed(_)))
        ));
    }
}
