//! Configuration initialization and hierarchy management

use anyhow::{Context, Result};
use tracing::debug;

use crate::adapters::TomlConfigAdapter;
use crate::app::config::EditorConfig;
use crate::cli::Cli;

/// Build the configuration with precedence: CLI > Env > File > Defaults
pub fn initialize_configuration(cli: &Cli) -> Result<EditorConfig> {
    let mut adapter = TomlConfigAdapter::new();

    match &cli.config {
        Some(path) => adapter
            .load_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            adapter.load_first_existing()?;
        }
    }

    adapter
        .apply_process_env()
        .context("Invalid environment override")?;

    apply_cli_overrides(&mut adapter, cli);

    debug!(file = ?adapter.config_file_path(), "Configuration resolved");
    Ok(adapter.finish()?)
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(adapter: &mut TomlConfigAdapter, cli: &Cli) -> usize {
    let mut overrides = 0;
    if let Some(level) = &cli.log_level {
        adapter.config_mut().logging.level = level.clone();
        overrides += 1;
    }
    overrides
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_file_then_cli_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"warn\"\n\n[sampler]\nthumbnail_count = 4").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let cli = Cli::try_parse_from(["violet", "--config", path.as_str(), "inspect", "--in", "a.mp4"]).unwrap();
        let config = initialize_configuration(&cli).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.sampler.thumbnail_count, 4);

        let cli = Cli::try_parse_from([
            "violet", "--config", path.as_str(), "--log-level", "trace", "inspect", "--in", "a.mp4",
        ])
        .unwrap();
        let config = initialize_configuration(&cli).unwrap();
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_invalid_cli_level_rejected() {
        let cli = Cli::try_parse_from(["violet", "--log-level", "loud", "inspect", "--in", "a.mp4"]).unwrap();
        assert!(initialize_configuration(&cli).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::try_parse_from([
            "violet", "--config", "/nonexistent/violet.toml", "inspect", "--in", "a.mp4",
        ])
        .unwrap();
        assert!(initialize_configuration(&cli).is_err());
    }
}
