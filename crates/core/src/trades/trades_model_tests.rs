//! Tests for Trade domain models.

#[cfg(test)]
mod tests {
    use crate::constants::MAX_TRADE_AMOUNT;
    use crate::errors::{Error, ValidationError};
    use crate::trades::trades_model::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_trade(commission: rust_decimal::Decimal) -> Trade {
        Trade {
            id: "trade-1".to_string(),
            account_id: "acc-1".to_string(),
            symbol: Some("EURUSD".to_string()),
            source: TradeSource::Manual,
            date: "2024-01-01".to_string(),
            profit: dec!(100),
            commission,
            swap: dec!(-1.5),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    // ============================================================================
    // Trade P&L helpers
    // ============================================================================

    #[test]
    fn test_gross_pnl_uses_stored_commission_sign() {
        assert_eq!(create_test_trade(dec!(-5)).gross_pnl(), dec!(93.5));
        assert_eq!(create_test_trade(dec!(5)).gross_pnl(), dec!(103.5));
    }

    #[test]
    fn test_net_pnl_always_charges_commission() {
        assert_eq!(create_test_trade(dec!(-5)).net_pnl(), dec!(93.5));
        assert_eq!(create_test_trade(dec!(5)).net_pnl(), dec!(93.5));
    }

    // ============================================================================
    // TradeSource
    // ============================================================================

    #[test]
    fn test_trade_source_round_trips_through_str() {
        for source in [
            TradeSource::Manual,
            TradeSource::BrokerSync,
            TradeSource::FileUpload,
        ] {
            assert_eq!(source.as_str().parse::<TradeSource>().unwrap(), source);
        }
        assert!("CARRIER_PIGEON".parse::<TradeSource>().is_err());
    }

    #[test]
    fn test_trade_serializes_camel_case() {
        let value = serde_json::to_value(create_test_trade(dec!(-5))).unwrap();
        assert_eq!(value["accountId"], json!("acc-1"));
        assert_eq!(value["source"], json!("MANUAL"));
        assert!(value.get("createdAt").is_some());
    }

    // ============================================================================
    // Decimal parsing
    // ============================================================================

    #[test]
    fn test_parse_decimal_field_accepts_plain_and_scientific() {
        assert_eq!(parse_decimal_field("profit", " 12.50 ").unwrap(), dec!(12.50));
        assert_eq!(parse_decimal_field("profit", "-3").unwrap(), dec!(-3));
        assert_eq!(parse_decimal_field("profit", "1.5e2").unwrap(), dec!(150));
    }

    #[test]
    fn test_parse_decimal_field_rejects_non_numeric() {
        for raw in ["abc", "NaN", "12,5x", ""] {
            let err = parse_decimal_field("profit", raw).unwrap_err();
            assert!(
                matches!(err, Error::MalformedRecord { ref field, .. } if field == "profit"),
                "expected MalformedRecord for {:?}, got {:?}",
                raw,
                err
            );
        }
    }

    #[test]
    fn test_parse_decimal_field_rejects_out_of_range_amounts() {
        assert_eq!(
            parse_decimal_field("profit", "1000000000000000").unwrap(),
            MAX_TRADE_AMOUNT
        );
        for raw in ["50000000000000000000000000000", "-1000000000000000.01", "2e15"] {
            let err = parse_decimal_field("profit", raw).unwrap_err();
            assert!(
                matches!(err, Error::MalformedRecord { ref field, .. } if field == "profit"),
                "expected MalformedRecord for {:?}, got {:?}",
                raw,
                err
            );
        }
    }

    #[test]
    fn test_parse_optional_decimal_field_treats_empty_as_zero() {
        assert_eq!(parse_optional_decimal_field("swap", None).unwrap(), dec!(0));
        assert_eq!(parse_optional_decimal_field("swap", Some("  ")).unwrap(), dec!(0));
        assert_eq!(parse_optional_decimal_field("swap", Some("0.25")).unwrap(), dec!(0.25));
        assert!(parse_optional_decimal_field("swap", Some("n/a")).is_err());
    }

    // ============================================================================
    // TradeRecord normalization
    // ============================================================================

    #[test]
    fn test_manual_record_normalizes() {
        let record = TradeRecord::Manual(ManualTradeInput {
            account_id: " acc-1 ".to_string(),
            symbol: Some(" aapl ".to_string()),
            date: "2024-03-05T15:30:00Z".to_string(),
            profit: dec!(10),
            commission: dec!(1),
            swap: dec!(0),
        });

        let trade = record.normalize(chrono_tz::UTC).unwrap();
        assert_eq!(trade.id, None);
        assert_eq!(trade.account_id, "acc-1");
        assert_eq!(trade.symbol.as_deref(), Some("AAPL"));
        assert_eq!(trade.source, TradeSource::Manual);
        assert_eq!(trade.date, ymd(2024, 3, 5));
        assert_eq!(trade.iso_date(), "2024-03-05");
        assert_eq!(trade.commission, dec!(1));
    }

    #[test]
    fn test_manual_record_with_huge_amount_is_malformed() {
        let record = TradeRecord::Manual(ManualTradeInput {
            account_id: "acc-1".to_string(),
            symbol: None,
            date: "2024-03-05".to_string(),
            profit: dec!(1),
            commission: dec!(0),
            swap: dec!(50000000000000000000000000000),
        });

        assert!(matches!(
            record.normalize(chrono_tz::UTC),
            Err(Error::MalformedRecord { ref field, .. }) if field == "swap"
        ));
    }

    #[test]
    fn test_broker_record_turns_fee_into_charge() {
        let record: TradeRecord = serde_json::from_value(json!({
            "source": "BROKER_SYNC",
            "accountId": "acc-2",
            "brokerTradeId": "T-991",
            "symbol": "XAUUSD",
            "closedAt": "2024-02-29T23:30:00-05:00",
            "profit": "250.75",
            "fee": 3.5,
            "swap": -0.4
        }))
        .unwrap();

        let trade = record.normalize(chrono_tz::UTC).unwrap();
        assert_eq!(trade.id.as_deref(), Some("T-991"));
        assert_eq!(trade.source, TradeSource::BrokerSync);
        assert_eq!(trade.date, ymd(2024, 3, 1));
        assert_eq!(trade.profit, dec!(250.75));
        assert_eq!(trade.commission, dec!(-3.5));
        assert_eq!(trade.swap, dec!(-0.4));
    }

    #[test]
    fn test_broker_record_missing_optional_amounts_default_to_zero() {
        let record = TradeRecord::BrokerSync(BrokerTradeRecord {
            account_id: "acc".to_string(),
            broker_trade_id: "1".to_string(),
            symbol: None,
            closed_at: "2024-01-01".to_string(),
            profit: json!(1),
            fee: serde_json::Value::Null,
            swap: json!(""),
        });
        let trade = record.normalize(chrono_tz::UTC).unwrap();
        assert_eq!(trade.commission, dec!(0));
        assert_eq!(trade.swap, dec!(0));
    }

    #[test]
    fn test_broker_record_with_non_numeric_profit_is_malformed() {
        let record = TradeRecord::BrokerSync(BrokerTradeRecord {
            account_id: "acc".to_string(),
            broker_trade_id: "1".to_string(),
            symbol: None,
            closed_at: "2024-01-01".to_string(),
            profit: json!({"amount": 5}),
            fee: json!(0),
            swap: json!(0),
        });
        let err = record.normalize(chrono_tz::UTC).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { ref field, .. } if field == "profit"));
    }

    #[test]
    fn test_broker_record_requires_trade_id() {
        let record = TradeRecord::BrokerSync(BrokerTradeRecord {
            account_id: "acc".to_string(),
            broker_trade_id: "  ".to_string(),
            symbol: None,
            closed_at: "2024-01-01".to_string(),
            profit: json!(1),
            fee: json!(0),
            swap: json!(0),
        });
        assert!(matches!(
            record.normalize(chrono_tz::UTC),
            Err(Error::Validation(ValidationError::MissingField(_)))
        ));
    }

    #[test]
    fn test_file_row_normalizes() {
        let record = TradeRecord::FileUpload(FileTradeRow {
            account_id: "acc-3".to_string(),
            symbol: None,
            date: "01/15/2024".to_string(),
            profit: "-12.5".to_string(),
            commission: Some("2".to_string()),
            swap: None,
        });
        let trade = record.normalize(chrono_tz::UTC).unwrap();
        assert_eq!(trade.source, TradeSource::FileUpload);
        assert_eq!(trade.date, ymd(2024, 1, 15));
        assert_eq!(trade.profit, dec!(-12.5));
        assert_eq!(trade.commission, dec!(2));
        assert_eq!(trade.swap, dec!(0));
    }

    #[test]
    fn test_unparseable_date_is_malformed() {
        let record = TradeRecord::FileUpload(FileTradeRow {
            account_id: "acc".to_string(),
            date: "someday".to_string(),
            profit: "1".to_string(),
            ..Default::default()
        });
        let err = record.normalize(chrono_tz::UTC).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedRecord { ref field, ref value, .. } if field == "date" && value == "someday"
        ));
    }

    #[test]
    fn test_missing_account_is_rejected() {
        let record = TradeRecord::FileUpload(FileTradeRow {
            account_id: "".to_string(),
            date: "2024-01-01".to_string(),
            profit: "1".to_string(),
            ..Default::default()
        });
        assert!(matches!(
            record.normalize(chrono_tz::UTC),
            Err(Error::Validation(ValidationError::MissingField(ref f))) if f == "accountId"
        ));
    }

    // ============================================================================
    // TradeFilter
    // ============================================================================

    #[test]
    fn test_filter_matches_account_and_inclusive_range() {
        let trade = create_test_trade(dec!(0));
        assert!(TradeFilter::default().matches(&trade));
        assert!(TradeFilter::for_account("acc-1").matches(&trade));
        assert!(!TradeFilter::for_account("acc-2").matches(&trade));

        let filter = TradeFilter {
            account_id: None,
            start_date: Some(ymd(2024, 1, 1)),
            end_date: Some(ymd(2024, 1, 1)),
        };
        assert!(filter.matches(&trade));

        let later = TradeFilter {
            start_date: Some(ymd(2024, 1, 2)),
            ..Default::default()
        };
        assert!(!later.matches(&trade));
    }

    #[test]
    fn test_filter_with_dates_skips_non_iso_trade_dates() {
        let mut trade = create_test_trade(dec!(0));
        trade.date = "garbage".to_string();
        let filter = TradeFilter {
            end_date: Some(ymd(2030, 1, 1)),
            ..Default::default()
        };
        assert!(!filter.matches(&trade));
        assert!(TradeFilter::default().matches(&trade));
    }
}
