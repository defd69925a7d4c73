use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Upper bound applied to lab listing page sizes
    pub max_list_limit: Option<usize>,
    /// How many per-item lookups a single operation keeps in flight
    pub lookup_concurrency: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_list_limit: Some(100),
            lookup_concurrency: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when RUST_LOG is unset
    pub filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub fixture_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `var`. Unparseable numbers keep the preset value.
    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = var("SERVICE_MAX_LIST_LIMIT") {
            self.service.max_list_limit = v.parse::<usize>().ok().or(self.service.max_list_limit);
        }
        if let Some(v) = var("SERVICE_LOOKUP_CONCURRENCY") {
            self.service.lookup_concurrency = v
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .unwrap_or(self.service.lookup_concurrency);
        }
        if let Some(v) = var("LOG_FILTER") {
            self.logging.filter = v;
        }
        if let Some(v) = var("LAB_FIXTURE") {
            self.storage.fixture_path = PathBuf::from(v);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            service: ServiceConfig {
                max_list_limit: Some(1000),
                lookup_concurrency: 4,
            },
            logging: LoggingConfig {
                filter: "lab_service_rust=debug,info".to_string(),
            },
            storage: StorageConfig {
                fixture_path: PathBuf::from("fixtures/labs.json"),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            service: ServiceConfig {
                max_list_limit: Some(500),
                lookup_concurrency: 8,
            },
            logging: LoggingConfig {
                filter: "info".to_string(),
            },
            storage: StorageConfig {
                fixture_path: PathBuf::from("fixtures/labs.json"),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            service: ServiceConfig {
                max_list_limit: Some(100),
                lookup_concurrency: 16,
            },
            logging: LoggingConfig {
                filter: "warn".to_string(),
            },
            storage: StorageConfig {
                fixture_path: PathBuf::from("/var/lib/lab-service/labs.json"),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.service.max_list_limit, Some(1000));
        assert_eq!(config.service.lookup_concurrency, 4);
        assert!(config.logging.filter.contains("debug"));
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.service.max_list_limit, Some(100));
        assert_eq!(config.logging.filter, "warn");
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_malformed_list_limit_keeps_preset() {
        let config = AppConfig::production().with_overrides(vars(&[
            ("SERVICE_MAX_LIST_LIMIT", "abc"),
            ("SERVICE_LOOKUP_CONCURRENCY", "0"),
        ]));
        assert_eq!(config.service.max_list_limit, Some(100));
        assert_eq!(config.service.lookup_concurrency, 16);
    }

    #[test]
    fn test_valid_overrides_apply() {
        let config = AppConfig::production().with_overrides(vars(&[
            ("SERVICE_MAX_LIST_LIMIT", "25"),
            ("LAB_FIXTURE", "/tmp/labs.yaml"),
        ]));
        assert_eq!(config.service.max_list_limit, Some(25));
        assert_eq!(config.storage.fixture_path, PathBuf::from("/tmp/labs.yaml"));
    }

    #[test]
    fn test_service_defaults_are_bounded() {
        let service = ServiceConfig::default();
        assert!(service.lookup_concurrency > 0);
        assert!(service.max_list_limit.is_some());
    }
}
