use std::num::NonZeroUsize;

use anyhow::{Context, Result};

use crate::layout::PaperSize;

/// Application configuration loaded from environment variables.
/// Every variable has a default; a malformed value fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Paper size used by the PDF export.
    pub export_paper: PaperSize,
    /// Upper bound on concurrently open editing sessions.
    pub max_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            export_paper: PaperSize::A4,
            max_sessions: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, so tests need not touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        Ok(Config {
            port: optional_env(&lookup, "PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(defaults.port),
            rust_log: optional_env(&lookup, "RUST_LOG").unwrap_or(defaults.rust_log),
            export_paper: optional_env(&lookup, "EXPORT_PAPER")
                .map(|v| v.parse::<PaperSize>())
                .transpose()
                .map_err(anyhow::Error::msg)
                .context("EXPORT_PAPER must be 'a4' or 'letter'")?
                .unwrap_or(defaults.export_paper),
            max_sessions: optional_env(&lookup, "MAX_SESSIONS")
                .map(|v| v.parse::<NonZeroUsize>())
                .transpose()
                .context("MAX_SESSIONS must be a positive integer")?
                .map_or(defaults.max_sessions, NonZeroUsize::get),
        })
    }
}

fn optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(make_lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.export_paper, PaperSize::A4);
        assert_eq!(config.max_sessions, 1000);
    }

    #[test]
    fn test_values_are_read() {
        let config = Config::from_lookup(make_lookup(&[
            ("PORT", "3000"),
            ("RUST_LOG", "debug"),
            ("EXPORT_PAPER", "Letter"),
            ("MAX_SESSIONS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.rust_log, "debug");
        assert_eq!(config.export_paper, PaperSize::Letter);
        assert_eq!(config.max_sessions, 5);
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(Config::from_lookup(make_lookup(&[("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(make_lookup(&[("EXPORT_PAPER", "legal")])).is_err());
        assert!(Config::from_lookup(make_lookup(&[("MAX_SESSIONS", "-1")])).is_err());
    }

    #[test]
    fn test_zero_session_limit_fails() {
        let err = Config::from_lookup(make_lookup(&[("MAX_SESSIONS", "0")])).unwrap_err();
        assert!(err.to_string().contains("MAX_SESSIONS"));
    }
}
