//! Server configuration read from the environment at startup

use std::env;
use microtools_plugin::{DEFAULT_PRECISION, MAX_PRECISION};
use tracing::warn;

const PRECISION_VAR: &str = "MICROTOOLS_PRECISION";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Fractional digits used when rendering results
    pub precision: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { precision: DEFAULT_PRECISION }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Invalid values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(raw) = lookup(PRECISION_VAR) {
            match raw.trim().parse::<u32>() {
                Ok(p) if p > MAX_PRECISION => {
                    warn!("{}={} exceeds {}, clamping", PRECISION_VAR, p, MAX_PRECISION);
                    config.precision = MAX_PRECISION;
                }
                Ok(p) => config.precision = p,
                Err(_) => {
                    warn!("{}={:?} is not a valid precision, using {}", PRECISION_VAR, raw, DEFAULT_PRECISION);
                }
            }
        }

        config
    }
}
