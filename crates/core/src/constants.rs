use rust_decimal::Decimal;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Largest magnitude accepted for a single trade amount (1e15).
///
/// Sums of up to 10^13 such amounts stay inside `Decimal`'s range.
pub const MAX_TRADE_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Day key format used by the daily P&L map (`DD-MM-YYYY`)
pub const DAILY_KEY_FORMAT: &str = "%d-%m-%Y";

/// Canonical ISO day format stored on every normalized trade (`YYYY-MM-DD`)
pub const ISO_DAY_FORMAT: &str = "%Y-%m-%d";

/// Bucket that collects trades whose date cannot be parsed
pub const INVALID_DATE_KEY: &str = "invalid-date";
