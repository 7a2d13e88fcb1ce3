use std::{fs, io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::mood::EngineConfig;

/// Load engine tunables from a JSON file.
///
/// A missing file yields defaults. Unparsable contents are logged and also
/// yield defaults; any other I/O failure is returned.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!("No config at {}, using defaults", path.display());
            return Ok(EngineConfig::default());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to read config from {}", path.display()))
        }
    };

    match serde_json::from_str(&contents) {
        Ok(config) => Ok(config),
        Err(err) => {
            warn!("Ignoring invalid config {}: {err}", path.display());
            Ok(EngineConfig::default())
        }
    }
}

pub fn save_config(path: &Path, config: &EngineConfig) -> Result<()> {
    let serialized = serde_json::to_string_pretty(config)?;
    fs::write(path, serialized)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}
