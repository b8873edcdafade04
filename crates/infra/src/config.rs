//! Environment-driven ledger configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `SPLITLEDGER_MAX_MEMBERS` | `64` |
//! | `SPLITLEDGER_LOG_FORMAT` | `json` |
//! | `SPLITLEDGER_STARTING_WALLET` | `1000000` |

use thiserror::Error;

use splitledger_observability::LogFormat;

pub const MAX_MEMBERS_VAR: &str = "SPLITLEDGER_MAX_MEMBERS";
pub const LOG_FORMAT_VAR: &str = "SPLITLEDGER_LOG_FORMAT";
pub const STARTING_WALLET_VAR: &str = "SPLITLEDGER_STARTING_WALLET";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Capacity of a new group, never below 1.
    pub max_members: usize,
    pub log_format: LogFormat,
    /// Wallet balance given to each participant by the CLI.
    pub starting_wallet: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_members: 64,
            log_format: LogFormat::Json,
            starting_wallet: 1_000_000,
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let max_members = match lookup(MAX_MEMBERS_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid {
                    var: MAX_MEMBERS_VAR,
                    expected: "a positive integer",
                    value: raw.clone(),
                })?
                .max(1),
            None => defaults.max_members,
        };

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse::<LogFormat>().map_err(|_| ConfigError::Invalid {
                var: LOG_FORMAT_VAR,
                expected: "`json` or `pretty`",
                value: raw.clone(),
            })?,
            None => defaults.log_format,
        };

        let starting_wallet = match lookup(STARTING_WALLET_VAR) {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(v) if v >= 0 => v,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: STARTING_WALLET_VAR,
                        expected: "a non-negative integer",
                        value: raw,
                    });
                }
            },
            None => defaults.starting_wallet,
        };

        Ok(Self {
            max_members,
            log_format,
            starting_wallet,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_variables_use_defaults() {
        let config = LedgerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, LedgerConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = LedgerConfig::from_lookup(lookup(&[
            (MAX_MEMBERS_VAR, "5"),
            (LOG_FORMAT_VAR, "pretty"),
            (STARTING_WALLET_VAR, "100"),
        ]))
        .unwrap();

        assert_eq!(config.max_members, 5);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.starting_wallet, 100);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let config = LedgerConfig::from_lookup(lookup(&[(MAX_MEMBERS_VAR, "0")])).unwrap();
        assert_eq!(config.max_members, 1);
    }

    #[test]
    fn malformed_values_are_reported_with_their_variable() {
        let err = LedgerConfig::from_lookup(lookup(&[(MAX_MEMBERS_VAR, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: MAX_MEMBERS_VAR, .. }));

        let err = LedgerConfig::from_lookup(lookup(&[(LOG_FORMAT_VAR, "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: LOG_FORMAT_VAR, .. }));

        let err = LedgerConfig::from_lookup(lookup(&[(STARTING_WALLET_VAR, "-3")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: STARTING_WALLET_VAR, .. }));
    }
}
