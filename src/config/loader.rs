// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::local::LocalStageFactory;
use crate::config::consts::{DEFAULT_STAGES, DEFAULT_SUMMARY_LINES};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure for the `thud` demo and the engine it drives.
///
/// # Fields
/// * `engine` - Settings threaded into every invoker (optional)
/// * `stages` - Names of local stages appended to each file read (optional)
///
/// # Example
/// ```yaml
/// engine:
///   trace: true
///   summary_lines: 4
/// stages:
///   - trim_eof
///   - print
///   - report_end
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default = "default_stages")]
    pub stages: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            stages: default_stages(),
        }
    }
}

/// Engine-wide settings, passed explicitly to invokers.
///
/// # Fields
/// * `trace` - Emit every state transition and the full diagnostic log of each run
/// * `summary_lines` - Lines of an unrecoverable failure kept in the short summary
///   printed when `trace` is off
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub trace: bool,
    #[serde(default = "default_summary_lines")]
    pub summary_lines: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trace: false,
            summary_lines: DEFAULT_SUMMARY_LINES,
        }
    }
}

impl EngineConfig {
    pub fn traced() -> Self {
        Self {
            trace: true,
            ..Self::default()
        }
    }
}

fn default_summary_lines() -> usize {
    DEFAULT_SUMMARY_LINES
}

fn default_stages() -> Vec<String> {
    DEFAULT_STAGES.iter().map(|s| s.to_string()).collect()
}

/// Load configuration from a YAML (`.yaml`/`.yml`) or TOML (`.toml`) file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        Some("toml") => Ok(toml::from_str(&content)?),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load configuration and reject values the engine cannot use.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let config = load_config(path)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.engine.summary_lines == 0 {
        return Err(ConfigError::Invalid(
            "engine.summary_lines must be at least 1".to_string(),
        ));
    }
    for stage in &config.stages {
        if !LocalStageFactory::is_available(stage) {
            return Err(ConfigError::Invalid(format!(
                "unknown stage '{}' (available: {})",
                stage,
                LocalStageFactory::list_available().join(", ")
            )));
        }
    }
    Ok(())
}
