//! Runtime configuration for taskward services.
//!
//! Configuration is plain data: it can be deserialized from JSON, built from
//! defaults, and overridden from `TASKWARD_*` environment variables.
//!
//! # Examples
//!
//! ```
//! use taskward::config::TaskwardConfig;
//!
//! let config = TaskwardConfig::from_json_str(r#"{"pagination": {"max_limit": 50}}"#)
//!     .expect("valid configuration");
//! assert_eq!(config.pagination.max_limit, 50);
//! assert_eq!(config.pagination.default_limit, 10);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`PaginationConfig::default_limit`].
pub const ENV_DEFAULT_PAGE_LIMIT: &str = "TASKWARD_DEFAULT_PAGE_LIMIT";
/// Environment variable overriding [`PaginationConfig::max_limit`].
pub const ENV_MAX_PAGE_LIMIT: &str = "TASKWARD_MAX_PAGE_LIMIT";
/// Environment variable overriding [`TaskwardConfig::log_filter`].
pub const ENV_LOG_FILTER: &str = "TASKWARD_LOG";
/// Environment variable overriding [`TaskwardConfig::database_url`].
pub const ENV_DATABASE_URL: &str = "TASKWARD_DATABASE_URL";

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    /// An environment override is not a valid value.
    #[error("invalid value '{value}' for {key}")]
    InvalidValue {
        /// Offending variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },

    /// The default page size exceeds the maximum page size.
    #[error("default page limit {default_limit} exceeds maximum {max_limit}")]
    InconsistentPagination {
        /// Configured default limit.
        default_limit: u32,
        /// Configured maximum limit.
        max_limit: u32,
    },
}

/// Pagination bounds for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size used when the caller does not supply one.
    pub default_limit: u32,
    /// Largest page size a caller may request.
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskwardConfig {
    /// Pagination bounds.
    pub pagination: PaginationConfig,
    /// `tracing-subscriber` filter directive, e.g. `taskward=debug`.
    pub log_filter: String,
    /// `PostgreSQL` connection URL for the Diesel adapters.
    pub database_url: Option<String>,
}

impl Default for TaskwardConfig {
    fn default() -> Self {
        Self {
            pagination: PaginationConfig::default(),
            log_filter: "taskward=info,warn".to_owned(),
            database_url: None,
        }
    }
}

impl TaskwardConfig {
    /// Parses a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InconsistentPagination`] when the default page size
    /// exceeds the maximum.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validated()
    }

    /// Builds configuration from defaults and process environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an override is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides obtained from `lookup`, keyed by the `ENV_*`
    /// variable names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric override does not
    /// parse and [`ConfigError::InconsistentPagination`] when the resulting
    /// limits conflict.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(ENV_DEFAULT_PAGE_LIMIT) {
            self.pagination.default_limit = parse_limit(ENV_DEFAULT_PAGE_LIMIT, value)?;
        }
        if let Some(value) = lookup(ENV_MAX_PAGE_LIMIT) {
            self.pagination.max_limit = parse_limit(ENV_MAX_PAGE_LIMIT, value)?;
        }
        if let Some(filter) = lookup(ENV_LOG_FILTER) {
            self.log_filter = filter;
        }
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database_url = Some(url);
        }
        self.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let PaginationConfig {
            default_limit,
            max_limit,
        } = self.pagination;
        if default_limit > max_limit {
            return Err(ConfigError::InconsistentPagination {
                default_limit,
                max_limit,
            });
        }
        Ok(self)
    }
}

fn parse_limit(key: &'static str, value: String) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}
