//! Configuration module
//!
//! Worker configuration is read from the environment (and an optional `.env`
//! file). Only storage selection and logging are configurable; the sidecar
//! layout is fixed.

use std::env;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

const DEFAULT_ENVIRONMENT: &str = "development";

/// Log output format for the worker binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub storage_backend: StorageBackend,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is applied first when present.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(value) => value.parse::<LogFormat>()?,
            None if is_production_environment(&environment) => LogFormat::Json,
            None => LogFormat::default(),
        };

        let config = Config {
            environment,
            storage_backend,
            s3_region: non_empty(lookup("S3_REGION")),
            s3_endpoint: non_empty(lookup("S3_ENDPOINT")),
            aws_region: non_empty(lookup("AWS_REGION")),
            local_storage_path: non_empty(lookup("LOCAL_STORAGE_PATH")),
            local_storage_base_url: non_empty(lookup("LOCAL_STORAGE_BASE_URL")),
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_region().is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_environment(&self.environment)
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    /// Region for the S3 backend; `S3_REGION` wins over `AWS_REGION`.
    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    /// Base URL reported for local writes; falls back to a `file://` URL of the root.
    pub fn local_storage_base_url(&self) -> Option<String> {
        self.local_storage_base_url.clone().or_else(|| {
            self.local_storage_path
                .as_ref()
                .map(|path| format!("file://{}", path.trim_end_matches('/')))
        })
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

fn is_production_environment(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_to_s3_backend() {
        let config = Config::from_lookup(lookup_from(&[("AWS_REGION", "eu-west-1")])).unwrap();

        assert_eq!(config.storage_backend(), StorageBackend::S3);
        assert_eq!(config.s3_region(), Some("eu-west-1"));
        assert_eq!(config.environment, "development");
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert!(!config.is_production());
    }

    #[test]
    fn test_s3_region_takes_precedence_over_aws_region() {
        let config = Config::from_lookup(lookup_from(&[
            ("S3_REGION", "us-east-2"),
            ("AWS_REGION", "eu-west-1"),
        ]))
        .unwrap();

        assert_eq!(config.s3_region(), Some("us-east-2"));
    }

    #[test]
    fn test_s3_backend_requires_region() {
        let result = Config::from_lookup(lookup_from(&[("STORAGE_BACKEND", "s3")]));
        assert!(result.is_err());

        let result = Config::from_lookup(lookup_from(&[("AWS_REGION", "  ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_local_backend_requires_path() {
        let result = Config::from_lookup(lookup_from(&[("STORAGE_BACKEND", "local")]));
        assert!(result.is_err());

        let config = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/var/lib/imgmeta/"),
        ]))
        .unwrap();
        assert_eq!(config.storage_backend(), StorageBackend::Local);
        assert_eq!(
            config.local_storage_base_url().as_deref(),
            Some("file:///var/lib/imgmeta")
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "ftp"),
            ("AWS_REGION", "eu-west-1"),
        ]));
        assert!(result.is_err());

        let result = Config::from_lookup(lookup_from(&[
            ("LOG_FORMAT", "xml"),
            ("AWS_REGION", "eu-west-1"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_production_environment_defaults_to_json_logs() {
        let config = Config::from_lookup(lookup_from(&[
            ("APP_ENV", "Prod"),
            ("AWS_REGION", "eu-west-1"),
        ]))
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.environment(), "Prod");
        assert_eq!(config.log_format(), LogFormat::Json);

        let config = Config::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("AWS_REGION", "eu-west-1"),
            ("LOG_FORMAT", "compact"),
        ]))
        .unwrap();
        assert_eq!(config.log_format(), LogFormat::Compact);
    }
}
