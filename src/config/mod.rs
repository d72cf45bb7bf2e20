//! # Timeline Configuration
//!
//! Explicitly constructed, immutable configuration. The [`ConfigLoader`] layers
//! built-in defaults, an optional TOML/YAML file and `TIMELINE__*` environment
//! variables, and hands back a plain [`TimelineConfig`] value that components
//! receive at construction. There is no process-wide cached configuration.
//!
//! ## Configuration Structure
//!
//! ```toml
//! [database]
//! url = "${DATABASE_URL}"
//! schema = "public"
//! artifacts_schema = "artifacts"
//! max_connections = 5
//!
//! [timeline]
//! warning_threshold_minutes = 5
//! danger_threshold_minutes = 15
//! demo_fallback_enabled = false
//!
//! [graph]
//! matcher = "regex"
//! source_prefix = "source:"
//!
//! [logging]
//! format = "pretty"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dbt_timeline::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().with_file("config/timeline.toml").load()?;
//! let warning = config.timeline.warning_threshold_minutes;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    DEFAULT_DANGER_THRESHOLD_MINUTES, DEFAULT_HISTORY_RUN_LIMIT, DEFAULT_WARNING_THRESHOLD_MINUTES,
    SOURCE_PREFIX,
};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigLoader;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Storage collaborator connection settings
    pub database: DatabaseConfig,

    /// Timeline classification and fallback policy
    pub timeline: TimelineSettings,

    /// Dependency extraction settings
    pub graph: GraphConfig,

    /// Structured logging settings
    pub logging: LoggingConfig,
}

/// Database connection and pooling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    /// Schema holding `dbt_projects` and the model/execution marts
    pub schema: String,
    /// Schema holding raw dbt_artifacts tables (dependencies, invocations)
    pub artifacts_schema: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            schema: "public".to_string(),
            artifacts_schema: "artifacts".to_string(),
            max_connections: 5,
            acquire_timeout_seconds: 10,
        }
    }
}

impl DatabaseConfig {
    /// Resolve the connection URL, falling back to `DATABASE_URL`
    pub fn database_url(&self) -> ConfigResult<String> {
        if let Some(url) = &self.url {
            if !url.is_empty() && !url.contains("${") {
                return Ok(url.clone());
            }
        }

        std::env::var("DATABASE_URL").map_err(|_| {
            ConfigurationError::missing_required_field(
                "database.url",
                "database configuration (or DATABASE_URL)",
            )
        })
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }
}

/// Duration classification thresholds and the upstream-failure policy
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimelineSettings {
    pub warning_threshold_minutes: i64,
    pub danger_threshold_minutes: i64,
    /// Substitute a flagged demo dataset when the store is unreachable
    pub demo_fallback_enabled: bool,
    /// Number of recent invocations sampled by the performance history view
    pub history_run_limit: i64,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            warning_threshold_minutes: DEFAULT_WARNING_THRESHOLD_MINUTES,
            danger_threshold_minutes: DEFAULT_DANGER_THRESHOLD_MINUTES,
            demo_fallback_enabled: false,
            history_run_limit: DEFAULT_HISTORY_RUN_LIMIT,
        }
    }
}

/// Which reference matcher the graph extractor is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    #[default]
    Regex,
    Template,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphConfig {
    pub matcher: MatcherKind,
    /// Marker prepended to external source dependencies
    pub source_prefix: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            matcher: MatcherKind::default(),
            source_prefix: SOURCE_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Explicit filter directive; environment default when unset
    pub level: Option<String>,
    pub format: LogFormat,
}

impl TimelineConfig {
    /// Validate cross-field constraints
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.schema.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "database.schema",
                "database configuration",
            ));
        }

        if self.database.artifacts_schema.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "database.artifacts_schema",
                "database configuration",
            ));
        }

        for (field, schema) in [
            ("database.schema", &self.database.schema),
            ("database.artifacts_schema", &self.database.artifacts_schema),
        ] {
            if !is_sql_identifier(schema) {
                return Err(ConfigurationError::invalid_value(
                    field,
                    schema.clone(),
                    "schema must be a plain SQL identifier",
                ));
            }
        }

        if self.database.max_connections == 0 {
            return Err(ConfigurationError::invalid_value(
                "database.max_connections",
                "0",
                "pool size must be greater than 0",
            ));
        }

        let timeline = &self.timeline;
        if timeline.warning_threshold_minutes < 0 {
            return Err(ConfigurationError::invalid_value(
                "timeline.warning_threshold_minutes",
                timeline.warning_threshold_minutes.to_string(),
                "threshold must not be negative",
            ));
        }

        if timeline.warning_threshold_minutes >= timeline.danger_threshold_minutes {
            return Err(ConfigurationError::invalid_value(
                "timeline.danger_threshold_minutes",
                timeline.danger_threshold_minutes.to_string(),
                format!(
                    "must be greater than warning_threshold_minutes ({})",
                    timeline.warning_threshold_minutes
                ),
            ));
        }

        if timeline.history_run_limit <= 0 {
            return Err(ConfigurationError::invalid_value(
                "timeline.history_run_limit",
                timeline.history_run_limit.to_string(),
                "must be greater than 0",
            ));
        }

        if self.graph.source_prefix.is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "graph.source_prefix",
                "graph configuration",
            ));
        }

        Ok(())
    }
}

/// Schema names are interpolated into queries, so only bare identifiers are allowed
fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TimelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.schema, "public");
        assert_eq!(config.timeline.warning_threshold_minutes, 5);
        assert_eq!(config.timeline.danger_threshold_minutes, 15);
        assert!(!config.timeline.demo_fallback_enabled);
        assert_eq!(config.graph.matcher, MatcherKind::Regex);
        assert_eq!(config.graph.source_prefix, "source:");
    }

    #[test]
    fn test_threshold_ordering_is_enforced() {
        let mut config = TimelineConfig::default();
        config.timeline.warning_threshold_minutes = 15;
        config.timeline.danger_threshold_minutes = 15;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
    }

    #[test]
    fn test_zero_pool_rejected() {
        let mut config = TimelineConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_schema_rejected() {
        let mut config = TimelineConfig::default();
        config.database.schema = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::MissingRequiredField { .. })
        ));
    }

    #[test]
    fn test_schema_must_be_identifier() {
        let mut config = TimelineConfig::default();
        config.database.schema = "public; DROP TABLE x".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidValue { .. })
        ));

        config.database.schema = "dbt_artifacts".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_url_wins() {
        let config = DatabaseConfig {
            url: Some("postgresql://localhost/dbt".to_string()),
            ..Default::default()
        };
        assert_eq!(config.database_url().unwrap(), "postgresql://localhost/dbt");
    }
}
