//! Configuration Loader
//!
//! Layers built-in defaults, an optional configuration file and environment
//! variable overrides using the `config` crate, then validates the result.

use config::{Config, Environment, File, FileFormat};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

use super::error::{ConfigResult, ConfigurationError};
use super::TimelineConfig;

/// Conventional location checked when no explicit file is given
pub const DEFAULT_CONFIG_PATH: &str = "config/timeline.toml";

/// Prefix for environment overrides, e.g. `TIMELINE__DATABASE__SCHEMA`
pub const ENV_PREFIX: &str = "TIMELINE";

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid")
});

/// Builder for [`TimelineConfig`] values
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_overrides: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from an explicit file; a missing explicit file is an error
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Replace the process environment as the override source
    pub fn with_env_overrides(mut self, vars: HashMap<String, String>) -> Self {
        self.env_overrides = Some(vars);
        self
    }

    /// Build, deserialize and validate the configuration
    pub fn load(&self) -> ConfigResult<TimelineConfig> {
        let mut builder = Config::builder();

        let file = match &self.file {
            Some(path) if !path.exists() => {
                return Err(ConfigurationError::config_file_not_found(path));
            }
            Some(path) => Some(path.clone()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|p| p.exists()),
        };

        let source_name = match &file {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .map_err(|e| ConfigurationError::load_failed(path.display().to_string(), e))?;
                let contents = substitute_env_vars(&raw);
                builder = builder.add_source(File::from_str(&contents, file_format(path)));
                path.display().to_string()
            }
            None => "defaults".to_string(),
        };

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(self.env_overrides.clone());
        builder = builder.add_source(environment);

        let config: TimelineConfig = builder
            .build()
            .and_then(|built| built.try_deserialize::<TimelineConfig>())
            .map_err(|e| ConfigurationError::load_failed(&source_name, e))?;

        config.validate()?;

        debug!(
            source = %source_name,
            schema = %config.database.schema,
            matcher = ?config.graph.matcher,
            demo_fallback = config.timeline.demo_fallback_enabled,
            "Configuration loaded"
        );

        Ok(config)
    }
}

fn file_format(path: &Path) -> FileFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        Some("json") => FileFormat::Json,
        _ => FileFormat::Toml,
    }
}

/// Replace `${VAR}` with environment values, leaving unresolved placeholders intact
pub fn substitute_env_vars(content: &str) -> String {
    ENV_PLACEHOLDER
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{var_name}}}"))
        })
        .to_string()
}
