//! Loads [`HubConfig`] from files and environment variables.

use super::HubConfig;
use crate::error::{HubError, Result};
use ::config::{Config, Environment, File};
use std::path::{Path, PathBuf};

/// Builder that merges hub settings from several sources.
///
/// Files are applied in the order they were added, so later files override
/// earlier ones. Environment variables are applied last and win over every
/// file.
///
/// # Examples
///
/// ```rust,no_run
/// use statehub::config::HubConfig;
///
/// # fn example() -> statehub::error::Result<()> {
/// // HUB_FAILURE_POLICY=propagate -> failure_policy = Propagate
/// let config = HubConfig::loader()
///     .with_file("config/hub.yaml")
///     .with_env_overrides("HUB", "__")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct HubConfigLoader {
    file_paths: Vec<PathBuf>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
}

impl HubConfigLoader {
    /// Create a loader with no sources. Loading it yields the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file source. Supported: `.yaml`, `.yml`, `.toml`, `.json`.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Read overrides from variables named `{prefix}_{KEY}`.
    ///
    /// `separator` splits nested keys; hub settings are flat, so it only
    /// matters for forward compatibility of the variable names.
    pub fn with_env_overrides(mut self, prefix: &str, separator: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self.env_separator = Some(separator.to_string());
        self
    }

    /// Merge all sources, deserialize and validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A file has an unsupported extension or does not exist
    /// - A source cannot be parsed
    /// - The merged values do not deserialize into [`HubConfig`]
    /// - [`HubConfig::validate`] rejects the result
    pub fn load(&self) -> Result<HubConfig> {
        let mut builder = Config::builder();

        for path in &self.file_paths {
            check_extension(path)?;
            if !path.exists() {
                return Err(HubError::LoadError(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path.clone()).required(true));
        }

        if let (Some(prefix), Some(separator)) = (&self.env_prefix, &self.env_separator) {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator(separator)
                    .try_parsing(true),
            );
        }

        let merged = builder
            .build()
            .map_err(|e| HubError::LoadError(format!("Failed to build configuration: {}", e)))?;

        let config: HubConfig = merged.try_deserialize().map_err(|e| {
            HubError::DeserializationError(format!("Failed to deserialize hub configuration: {}", e))
        })?;

        config.validate()?;

        tracing::debug!(
            failure_policy = ?config.failure_policy,
            catch_panics = config.catch_panics,
            history_capacity = config.history_capacity,
            files = self.file_paths.len(),
            "loaded hub configuration"
        );

        Ok(config)
    }
}

fn check_extension(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| {
            HubError::LoadError(format!(
                "Unable to determine file format for: {}",
                path.display()
            ))
        })?;

    match extension {
        "yaml" | "yml" | "toml" | "json" => Ok(()),
        _ => Err(HubError::LoadError(format!(
            "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
            extension
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailurePolicy;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_no_sources_yields_defaults() {
        let config = HubConfigLoader::new().load().unwrap();
        assert_eq!(config, HubConfig::default());
    }

    #[test]
    fn test_builder_accumulates_files() {
        let loader = HubConfigLoader::new()
            .with_file("a.yaml")
            .with_file("b.toml");
        assert_eq!(loader.file_paths.len(), 2);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = HubConfigLoader::new().with_file("hub.ini").load();
        assert!(matches!(result, Err(HubError::LoadError(msg)) if msg.contains("Unsupported")));
    }

    #[test]
    fn test_missing_file() {
        let result = HubConfigLoader::new()
            .with_file("/definitely/not/here/hub.yaml")
            .load();
        assert!(matches!(result, Err(HubError::LoadError(msg)) if msg.contains("not found")));
    }

    #[test]
    fn test_later_file_overrides_earlier() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base.yaml");
        let over = dir.path().join("override.toml");
        fs::write(&base, "failure_policy: propagate\nhistory_capacity: 4\n").unwrap();
        fs::write(&over, "history_capacity = 9\n").unwrap();

        let config = HubConfigLoader::new()
            .with_file(&base)
            .with_file(&over)
            .load()
            .unwrap();

        assert_eq!(config.failure_policy, FailurePolicy::Propagate);
        assert_eq!(config.history_capacity, 9);
        assert!(config.catch_panics);
    }

    #[test]
    fn test_invalid_value_is_deserialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hub.json");
        fs::write(&path, r#"{ "failure_policy": "explode" }"#).unwrap();

        let result = HubConfigLoader::new().with_file(&path).load();
        assert!(matches!(result, Err(HubError::DeserializationError(_))));
    }
}
