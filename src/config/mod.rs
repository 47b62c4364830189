//! Configuration module
//!
//! Settings come from a YAML or JSON file, then `TESTKIT_*` environment
//! variables, then command-line flags (applied by the binary).

mod env;
mod file;

pub use env::{print_env_help, EnvConfig, ENV_PREFIX};
pub use file::{find_config_file, CONFIG_LOCATIONS};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::executor::EngineConfig;
use crate::output::OutputFormat;
use crate::utils::logger::LogLevel;

/// Kit configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitConfig {
    /// Engine execution settings
    pub engine: EngineConfig,

    /// Log level of the binary
    pub log_level: LogLevel,

    /// Default output format of the binary
    pub output_format: OutputFormat,
}

impl KitConfig {
    /// Load configuration from a file, by extension YAML or JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: Self = file::read(path)?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        file::write(path.as_ref(), self)
    }

    /// Load the first config file found, or defaults when there is none
    pub fn load_default() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolve the effective configuration: file, then environment overrides
    ///
    /// The file is `explicit` when given, else `TESTKIT_CONFIG`, else the
    /// first of the standard locations that exists.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvConfig::load();
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env.config_file.as_ref().map(Into::into));
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::load_default()?,
        };
        config.apply_env(&env)?;
        Ok(config)
    }

    /// Override settings with values taken from the environment
    pub fn apply_env(&mut self, env: &EnvConfig) -> Result<()> {
        if let Some(parallel) = env.parallel {
            self.engine.parallel = parallel;
        }
        if let Some(max_concurrent) = env.max_concurrent {
            self.engine.max_concurrent = max_concurrent;
        }
        if let Some(level) = &env.log_level {
            self.log_level = LogLevel::from_str(level).with_context(|| {
                format!("Unknown log level in {ENV_PREFIX}_LOG_LEVEL: {level}")
            })?;
        }
        if let Some(format) = &env.format {
            self.output_format = OutputFormat::from_str(format).with_context(|| {
                format!("Unknown output format in {ENV_PREFIX}_FORMAT: {format}")
            })?;
        }
        self.validate()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.engine.max_concurrent == 0 {
            anyhow::bail!("engine.max_concurrent must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = KitConfig::default();
        assert!(!config.engine.parallel);
        assert_eq!(config.engine.max_concurrent, 4);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.output_format, OutputFormat::Table);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_load_yaml_and_json() {
        let dir = tempdir().unwrap();
        let config = KitConfig {
            engine: EngineConfig::parallel(8),
            log_level: LogLevel::Debug,
            output_format: OutputFormat::JsonPretty,
        };

        for name in ["testkit.yaml", "testkit.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(KitConfig::load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.yml");
        std::fs::write(&path, "engine:\n  parallel: true\noutput_format: csv\n").unwrap();

        let config = KitConfig::load(&path).unwrap();
        assert_eq!(config.engine, EngineConfig::parallel(4));
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "engine:\n  max_concurrent: 0\n").unwrap();

        let err = KitConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("max_concurrent"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = KitConfig::default();
        let env = EnvConfig {
            parallel: Some(true),
            max_concurrent: Some(2),
            log_level: Some("warn".to_string()),
            format: Some("summary".to_string()),
            ..Default::default()
        };

        config.apply_env(&env).unwrap();
        assert_eq!(config.engine, EngineConfig::parallel(2));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.output_format, OutputFormat::Summary);
    }

    #[test]
    fn test_env_rejects_unknown_values() {
        let env = EnvConfig {
            format: Some("xml".to_string()),
            ..Default::default()
        };
        assert!(KitConfig::default().apply_env(&env).is_err());

        let env = EnvConfig {
            max_concurrent: Some(0),
            ..Default::default()
        };
        assert!(KitConfig::default().apply_env(&env).is_err());
    }
}
