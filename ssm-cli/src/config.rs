//! Configuration file loading and logger setup

use crate::cli::{CliArgs, LogLevel};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use ssm_generator::GeneratorConfig;
use ssm_viewer::ViewerConfig;
use std::fs;
use std::path::Path;

/// Settings loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SsmConfig {
    /// Log verbosity.
    pub log_level: Option<LogLevel>,
    /// Generation settings.
    pub generator: GeneratorConfig,
    /// Viewer settings.
    pub viewer: ViewerConfig,
}

impl SsmConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

pub fn load_config(cli: &CliArgs) -> Result<SsmConfig> {
    match &cli.config {
        Some(path) => SsmConfig::load(path),
        None => Ok(SsmConfig::default()),
    }
}

/// Flag first, then `RUST_LOG`, then the config file, then `info`
pub fn resolve_log_level(cli: &CliArgs, config: &SsmConfig) -> String {
    if let Some(level) = cli.log_level {
        return level.as_str().to_string();
    }

    if let Ok(level) = std::env::var("RUST_LOG") {
        if !level.trim().is_empty() {
            return level;
        }
    }

    if let Some(level) = config.log_level {
        return level.as_str().to_string();
    }

    "info".to_string()
}

pub fn init_logger(level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stderr);
    builder.filter_level(log::LevelFilter::Info);
    builder.parse_filters(level);
    builder.format(|buf, record| {
        use std::io::Write;
        let module = record.module_path().unwrap_or(record.target());
        writeln!(
            buf,
            "{} [{}] {}: {}",
            buf.timestamp_millis(),
            record.level(),
            module,
            record.args()
        )
    });

    if let Err(err) = builder.try_init() {
        eprintln!("Failed to initialize logger: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssm_io::ArchiveVariant;
    use ssm_viewer::StoreMode;

    #[test]
    fn test_load_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ssm.toml");
        fs::write(
            &path,
            r#"
log_level = "warn"

[generator]
variant = "compressed"
output_dir = "archives"

[generator.render]
width = 640
height = 480

[viewer]
store = "memory"
"#,
        )
        .unwrap();

        let config = SsmConfig::load(&path).unwrap();
        assert_eq!(config.log_level, Some(LogLevel::Warn));
        assert_eq!(config.generator.variant, ArchiveVariant::Compressed);
        assert_eq!(config.generator.render.width, 640);
        assert_eq!(config.viewer.store, StoreMode::Memory);
        assert_eq!(config.viewer.canvas_width, 1200);
    }

    #[test]
    fn test_unknown_section_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[renderer]\nwidth = 3\n").unwrap();

        let err = SsmConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config file"));
    }
}
