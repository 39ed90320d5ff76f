// TOML config adapter - Layered configuration from files and environment

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::app::config::EditorConfig;
use crate::domain::errors::*;

/// Environment variables recognised as overrides
pub const ENV_THUMBNAIL_COUNT: &str = "VIOLET_THUMBNAIL_COUNT";
pub const ENV_SEEK_TIMEOUT_MS: &str = "VIOLET_SEEK_TIMEOUT_MS";
pub const ENV_FFMPEG: &str = "VIOLET_FFMPEG";
pub const ENV_FFPROBE: &str = "VIOLET_FFPROBE";
pub const ENV_LOG_LEVEL: &str = "VIOLET_LOG_LEVEL";

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config: EditorConfig,
    config_file_path: Option<PathBuf>,
}

impl TomlConfigAdapter {
    /// Create new adapter holding the defaults
    pub fn new() -> Self {
        Self {
            config: EditorConfig::default(),
            config_file_path: None,
        }
    }

    /// Files probed when no explicit path is given
    pub fn default_search_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("violet.toml"),
            PathBuf::from("config").join("violet.toml"),
        ]
    }

    /// Replace the current values with a TOML document; missing keys take defaults
    pub fn load_str(&mut self, toml_content: &str) -> Result<(), DomainError> {
        let parsed: EditorConfig = toml::from_str(toml_content)
            .map_err(|e| DomainError::ConfigFail(format!("Failed to parse TOML config: {}", e)))?;
        self.config = parsed;
        Ok(())
    }

    /// Load a config file
    pub fn load_file(&mut self, path: &Path) -> Result<(), DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        self.load_str(&content)?;
        self.config_file_path = Some(path.to_path_buf());
        info!("Loaded configuration from {}", path.display());
        Ok(())
    }

    /// Load the first existing file from `default_search_paths`
    pub fn load_first_existing(&mut self) -> Result<bool, DomainError> {
        for path in Self::default_search_paths() {
            if path.exists() {
                self.load_file(&path)?;
                return Ok(true);
            }
        }
        debug!("No configuration file found, using defaults");
        Ok(false)
    }

    /// Apply `VIOLET_*` overrides from a variable map
    pub fn apply_env(&mut self, vars: &HashMap<String, String>) -> Result<usize, DomainError> {
        let mut applied = 0;

        if let Some(value) = vars.get(ENV_THUMBNAIL_COUNT) {
            self.config.sampler.thumbnail_count = value.parse().map_err(|e| {
                DomainError::ConfigFail(format!("Invalid {}: {}", ENV_THUMBNAIL_COUNT, e))
            })?;
            applied += 1;
        }
        if let Some(value) = vars.get(ENV_SEEK_TIMEOUT_MS) {
            self.config.sampler.seek_timeout_ms = value.parse().map_err(|e| {
                DomainError::ConfigFail(format!("Invalid {}: {}", ENV_SEEK_TIMEOUT_MS, e))
            })?;
            applied += 1;
        }
        if let Some(value) = vars.get(ENV_FFMPEG) {
            self.config.engine.ffmpeg_path = PathBuf::from(value);
            applied += 1;
        }
        if let Some(value) = vars.get(ENV_FFPROBE) {
            self.config.engine.ffprobe_path = PathBuf::from(value);
            applied += 1;
        }
        if let Some(value) = vars.get(ENV_LOG_LEVEL) {
            self.config.logging.level = value.clone();
            applied += 1;
        }

        if applied > 0 {
            info!("Applied {} environment variable overrides", applied);
        }
        Ok(applied)
    }

    /// Apply overrides from the process environment
    pub fn apply_process_env(&mut self) -> Result<usize, DomainError> {
        let vars: HashMap<String, String> = std::env::vars()
            .filter(|(key, _)| key.starts_with("VIOLET_"))
            .collect();
        self.apply_env(&vars)
    }

    /// Serialize current values to TOML
    pub fn to_toml(&self) -> Result<String, DomainError> {
        toml::to_string_pretty(&self.config)
            .map_err(|e| DomainError::ConfigFail(format!("Failed to serialize config: {}", e)))
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EditorConfig {
        &mut self.config
    }

    pub fn config_file_path(&self) -> Option<&Path> {
        self.config_file_path.as_deref()
    }

    /// Validate and hand out the final configuration
    pub fn finish(self) -> Result<EditorConfig, DomainError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut adapter = TomlConfigAdapter::new();
        adapter
            .load_str("[sampler]\nthumbnail_count = 8\n\n[output]\ndownload_prefix = \"cut\"\n")
            .unwrap();
        let config = adapter.config();
        assert_eq!(config.sampler.thumbnail_count, 8);
        assert_eq!(config.sampler.canvas_width, 160);
        assert_eq!(config.output.download_prefix, "cut");
        assert_eq!(config.output.extension, "mp4");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let mut adapter = TomlConfigAdapter::new();
        let err = adapter.load_str("[sampler\n").unwrap_err();
        assert!(matches!(err, DomainError::ConfigFail(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sampler]\nthumbnail_count = 8\nseek_timeout_ms = 100").unwrap();

        let mut adapter = TomlConfigAdapter::new();
        adapter.load_file(file.path()).unwrap();
        assert_eq!(adapter.config_file_path(), Some(file.path()));

        let mut vars = HashMap::new();
        vars.insert(ENV_THUMBNAIL_COUNT.to_string(), "20".to_string());
        vars.insert(ENV_FFMPEG.to_string(), "/opt/ffmpeg/bin/ffmpeg".to_string());
        assert_eq!(adapter.apply_env(&vars).unwrap(), 2);

        let config = adapter.finish().unwrap();
        assert_eq!(config.sampler.thumbnail_count, 20);
        assert_eq!(config.sampler.seek_timeout_ms, 100);
        assert_eq!(config.engine.ffmpeg_path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
    }

    #[test]
    fn test_bad_env_value() {
        let mut adapter = TomlConfigAdapter::new();
        let mut vars = HashMap::new();
        vars.insert(ENV_THUMBNAIL_COUNT.to_string(), "many".to_string());
        assert!(adapter.apply_env(&vars).is_err());
    }

    #[test]
    fn test_finish_validates() {
        let mut adapter = TomlConfigAdapter::new();
        adapter.config_mut().sampler.thumbnail_count = 0;
        assert!(adapter.finish().is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let adapter = TomlConfigAdapter::new();
        let text = adapter.to_toml().unwrap();
        let mut reloaded = TomlConfigAdapter::new();
        reloaded.load_str(&text).unwrap();
        assert_eq!(reloaded.config(), adapter.config());
    }
}
