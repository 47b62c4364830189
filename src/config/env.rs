//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TESTKIT";

/// Overrides read from `TESTKIT_*` variables
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Parallel from TESTKIT_PARALLEL
    pub parallel: Option<bool>,
    /// Concurrency from TESTKIT_MAX_CONCURRENT
    pub max_concurrent: Option<usize>,
    /// Log level from TESTKIT_LOG_LEVEL
    pub log_level: Option<String>,
    /// Output format from TESTKIT_FORMAT
    pub format: Option<String>,
    /// Config file from TESTKIT_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load from any variable source, e.g. a map in tests
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}"));
        Self {
            parallel: get("PARALLEL").map(|v| parse_bool(&v)),
            max_concurrent: get("MAX_CONCURRENT").and_then(|v| v.trim().parse().ok()),
            log_level: get("LOG_LEVEL"),
            format: get("FORMAT"),
            config_file: get("CONFIG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.parallel.is_some()
            || self.max_concurrent.is_some()
            || self.log_level.is_some()
            || self.format.is_some()
            || self.config_file.is_some()
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}

/// Print all TESTKIT environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_PARALLEL        Run classes in parallel (true/false)");
    println!("  {ENV_PREFIX}_MAX_CONCURRENT  Maximum classes running at once");
    println!("  {ENV_PREFIX}_LOG_LEVEL       Log level (trace, debug, info, warn, error)");
    println!("  {ENV_PREFIX}_FORMAT          Output format (table, json, json-pretty, csv, summary)");
    println!("  {ENV_PREFIX}_CONFIG          Path to configuration file");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::from_lookup(lookup(&[]));
        assert_eq!(config, EnvConfig::default());
        assert!(!config.has_any());
    }

    #[test]
    fn test_env_values() {
        let config = EnvConfig::from_lookup(lookup(&[
            ("TESTKIT_PARALLEL", "yes"),
            ("TESTKIT_MAX_CONCURRENT", " 6 "),
            ("TESTKIT_LOG_LEVEL", "debug"),
            ("TESTKIT_FORMAT", "csv"),
            ("TESTKIT_CONFIG", "/tmp/testkit.yaml"),
        ]));
        assert_eq!(config.parallel, Some(true));
        assert_eq!(config.max_concurrent, Some(6));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.format.as_deref(), Some("csv"));
        assert_eq!(config.config_file.as_deref(), Some("/tmp/testkit.yaml"));
        assert!(config.has_any());
    }

    #[test]
    fn test_env_bool_parsing() {
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_unparsable_number_is_ignored() {
        let config = EnvConfig::from_lookup(lookup(&[("TESTKIT_MAX_CONCURRENT", "many")]));
        assert_eq!(config.max_concurrent, None);
    }
}
