use anyhow::{anyhow, Context};
use chrono_tz::Tz;
use tradejournal_core::pnl::PnlMode;
use tradejournal_core::utils::time_utils::{parse_timezone, DEFAULT_JOURNAL_TZ};

pub struct Config {
    pub db_path: String,
    pub timezone: Tz,
    pub default_pnl_mode: PnlMode,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset keys fall back to defaults,
    /// set-but-invalid keys are an error.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("TJ_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| "./db/journal.db".into());
        let timezone = match lookup("TJ_TIMEZONE") {
            Some(name) => {
                parse_timezone(&name).ok_or_else(|| anyhow!("Invalid TJ_TIMEZONE '{}'", name))?
            }
            None => DEFAULT_JOURNAL_TZ,
        };
        let default_pnl_mode = match lookup("TJ_DEFAULT_PNL_MODE") {
            Some(mode) => mode
                .parse::<PnlMode>()
                .with_context(|| "Invalid TJ_DEFAULT_PNL_MODE")?,
            None => PnlMode::default(),
        };
        Ok(Self {
            db_path,
            timezone,
            default_pnl_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.db_path, "./db/journal.db");
        assert_eq!(config.timezone, chrono_tz::UTC);
        assert_eq!(config.default_pnl_mode, PnlMode::Net);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("TJ_DB_PATH", "/tmp/j.db"),
            ("TJ_TIMEZONE", "America/New_York"),
            ("TJ_DEFAULT_PNL_MODE", "gross"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, "/tmp/j.db");
        assert_eq!(config.timezone, chrono_tz::America::New_York);
        assert_eq!(config.default_pnl_mode, PnlMode::Gross);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_lookup(lookup_from(&[("TJ_TIMEZONE", "Mars/Olympus")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("TJ_DEFAULT_PNL_MODE", "both")])).is_err());
    }
}
