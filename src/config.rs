//! Validation configuration
//!
//! Values come from the process environment (after loading `.env` through
//! `dotenv`) or from an explicit env file.

use std::collections::HashMap;
use std::path::Path;

pub const FAIL_FAST_VAR: &str = "LAYERKIT_VALIDATION_FAIL_FAST";
pub const MAX_ERRORS_VAR: &str = "LAYERKIT_VALIDATION_MAX_ERRORS";

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read env file: {0}")]
    EnvFile(#[from] dotenv::Error),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Ruleset validation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Stop at the first invalid rule and the first invalid subject
    pub fail_fast: bool,
    /// Maximum number of invalid rules to collect when not failing fast
    pub max_errors: Option<usize>,
}

impl Default for ValidationConfig {
    /// Creates a ValidationConfig populated with the defaults:
    /// - `fail_fast = true`
    /// - `max_errors = Some(10)`
    fn default() -> Self {
        Self {
            fail_fast: true,
            max_errors: Some(10),
        }
    }
}

impl ValidationConfig {
    /// Configuration that reports every failing subject and rule.
    pub fn exhaustive() -> Self {
        Self {
            fail_fast: false,
            max_errors: None,
        }
    }

    /// Reads the configuration from the process environment, loading `.env`
    /// first when one is present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable is set to
    /// something that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ValidationConfig::from_env`], falling back to the defaults and
    /// logging a warning when the environment holds invalid values.
    pub fn from_env_or_default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Invalid validation configuration, using defaults");
            Self::default()
        })
    }

    /// Reads the configuration from an env file without touching the process
    /// environment.
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut vars = HashMap::new();
        for item in dotenv::from_path_iter(path.as_ref())? {
            let (key, value) = item?;
            vars.insert(key, value);
        }
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Builds the configuration from a key lookup, keeping defaults for
    /// missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(FAIL_FAST_VAR) {
            config.fail_fast = parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                key: FAIL_FAST_VAR,
                value: raw.clone(),
            })?;
        }

        if let Some(raw) = lookup(MAX_ERRORS_VAR) {
            let trimmed = raw.trim();
            config.max_errors = if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(trimmed.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                    key: MAX_ERRORS_VAR,
                    value: raw.clone(),
                })?)
            };
        }

        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_fail_fast() {
        let cfg = ValidationConfig::default();
        assert!(cfg.fail_fast);
        assert_eq!(cfg.max_errors, Some(10));
    }

    #[test]
    fn test_lookup_overrides_defaults() {
        let cfg = ValidationConfig::from_lookup(lookup_from(&[
            (FAIL_FAST_VAR, "false"),
            (MAX_ERRORS_VAR, "3"),
        ]))
        .unwrap();
        assert!(!cfg.fail_fast);
        assert_eq!(cfg.max_errors, Some(3));
    }

    #[test]
    fn test_max_errors_none_disables_cap() {
        let cfg = ValidationConfig::from_lookup(lookup_from(&[(MAX_ERRORS_VAR, "none")])).unwrap();
        assert_eq!(cfg.max_errors, None);
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let err = ValidationConfig::from_lookup(lookup_from(&[(FAIL_FAST_VAR, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: FAIL_FAST_VAR, .. }));
    }

    #[test]
    fn test_reads_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}=no", FAIL_FAST_VAR).unwrap();
        writeln!(file, "{}=25", MAX_ERRORS_VAR).unwrap();

        let cfg = ValidationConfig::from_env_file(file.path()).unwrap();
        assert_eq!(
            cfg,
            ValidationConfig {
                fail_fast: false,
                max_errors: Some(25),
            }
        );
    }
}
