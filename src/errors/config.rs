// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating an engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported config format for '{}': expected .yaml, .yml or .toml", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
