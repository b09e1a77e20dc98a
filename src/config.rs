// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! TOML configuration.
//!
//! Every field is optional; an empty file (or no file) gives the built-in defaults.
//!
//! ```toml
//! [envelope]
//! page_name = "Page-1"
//! page_width = 850
//! page_height = 1100
//!
//! [decoder]
//! data_prefix = "data: "
//! done_sentinel = "[DONE]"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::EnvelopeOptions;
use crate::stream::DecoderOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub envelope: EnvelopeOptions,
    pub decoder: DecoderOptions,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// Loads `path` when given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = path else {
        log::debug!("no config file given, using defaults");
        return Ok(Config::default());
    };
    log::info!(path = path.display().to_string(); "loading configuration");
    let text = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    Config::from_toml(&text)
}
