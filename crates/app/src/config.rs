//! Process configuration read from the environment.

use std::path::PathBuf;

use rpcdesk_infrastructure::FileConfigStore;

/// Overrides the config directory.
pub const CONFIG_DIR_VAR: &str = "RPCDESK_CONFIG_DIR";

/// Default log filter when `RUST_LOG` is not set.
pub const LOG_VAR: &str = "RPCDESK_LOG";

/// Log filter used when neither variable is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while building the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No override was given and the platform has no config directory.
    #[error("could not determine config directory; set {CONFIG_DIR_VAR}")]
    NoConfigDir,
}

/// Settings for one run of the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the persisted config entries.
    pub config_dir: PathBuf,
    /// Fallback tracing filter.
    pub log_level: String,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError::NoConfigDir` if no directory can be chosen.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    /// Returns `ConfigError::NoConfigDir` if no directory can be chosen.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config_dir = match var(CONFIG_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => FileConfigStore::default_dir().ok_or(ConfigError::NoConfigDir)?,
        };
        let log_level = var(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            config_dir,
            log_level,
        })
    }

    /// Opens the config store in the configured directory.
    #[must_use]
    pub fn config_store(&self) -> FileConfigStore {
        FileConfigStore::new(self.config_dir.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (CONFIG_DIR_VAR, "/tmp/rpcdesk-test"),
            (LOG_VAR, "debug"),
        ]))
        .unwrap();

        assert_eq!(
            config,
            AppConfig {
                config_dir: PathBuf::from("/tmp/rpcdesk-test"),
                log_level: "debug".to_string(),
            }
        );
        assert_eq!(config.config_store().dir(), config.config_dir.as_path());
    }

    #[test]
    fn test_blank_values_fall_back() {
        let result = AppConfig::from_lookup(lookup(&[(CONFIG_DIR_VAR, " "), (LOG_VAR, "")]));

        // Without a platform config dir there is nothing to fall back to.
        if let Ok(config) = result {
            assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
            assert!(config.config_dir.ends_with("rpcdesk"));
        } else {
            assert!(FileConfigStore::default_dir().is_none());
        }
    }
}
