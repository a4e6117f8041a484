//! Runtime configuration.
//!
//! The API URL is baked in at build time from `AGUA_API_URL` and can be
//! overridden by the same variable at runtime, including from a `.env` file.

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

const API_URL_VAR: &str = "AGUA_API_URL";
const TIMEOUT_VAR: &str = "AGUA_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Reads `.env` (if any) and the process environment.
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("Ignoring unreadable .env: {}", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .or_else(|| option_env!("AGUA_API_URL").map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout = lookup(TIMEOUT_VAR).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(0) => None,
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                log::warn!("Ignoring {}={:?}: not a number of seconds", TIMEOUT_VAR, raw);
                None
            }
        });

        Self { api_url, timeout }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<_, _> = vars.iter().copied().collect();
        Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(
            config.api_url,
            option_env!("AGUA_API_URL").unwrap_or(DEFAULT_API_URL)
        );
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_environment_overrides() {
        let config = config(&[
            ("AGUA_API_URL", "https://agua.example.mx/api"),
            ("AGUA_TIMEOUT_SECS", "15"),
        ]);
        assert_eq!(config.api_url, "https://agua.example.mx/api");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_bad_timeout_is_ignored() {
        assert_eq!(config(&[("AGUA_TIMEOUT_SECS", "pronto")]).timeout, None);
        assert_eq!(config(&[("AGUA_TIMEOUT_SECS", "0")]).timeout, None);
    }
}
