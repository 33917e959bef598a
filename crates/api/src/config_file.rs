// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Loading of the planning configuration snapshot from a JSON file.

use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};
use wochenplan_domain::PlanningConfig;

/// Errors raised while loading the planning configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read planning config '{path}': {source}")]
    Io {
        /// The path that failed.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON for a `PlanningConfig`.
    #[error("failed to parse planning config '{path}': {source}")]
    Parse {
        /// The path that failed.
        path: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The file parsed but fails snapshot validation.
    #[error("invalid planning config '{path}': {reason}")]
    Invalid {
        /// The path that failed.
        path: String,
        /// The validation failure.
        reason: String,
    },
}

/// Loads the planning configuration, falling back to the built-in
/// defaults when no path is given or the file does not exist.
///
/// # Errors
///
/// Returns an error when a file that exists cannot be read, parsed, or
/// validated. A missing file is not an error.
pub fn load_planning_config(path: Option<&Path>) -> Result<PlanningConfig, ConfigError> {
    let Some(path) = path else {
        info!("no planning config path given, using built-in defaults");
        return Ok(PlanningConfig::default());
    };
    if !path.exists() {
        warn!(path = %path.display(), "planning config file not found, using built-in defaults");
        return Ok(PlanningConfig::default());
    }

    let display_path: String = path.display().to_string();
    let raw: String = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display_path.clone(),
        source,
    })?;
    let config: PlanningConfig =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display_path.clone(),
            source,
        })?;
    config.validate().map_err(|err| ConfigError::Invalid {
        path: display_path.clone(),
        reason: err.to_string(),
    })?;
    info!(path = %display_path, version = %config.version, "planning config loaded");
    Ok(config)
}
