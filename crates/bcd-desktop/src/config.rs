use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use bcd_core::patient_id::DEFAULT_PREFIX;
use bcd_export::styles::Letterhead;

/// Current config version. Bump this when adding fields or changing shape.
const CURRENT_VERSION: u32 = 1;

const CONFIG_FILE: &str = "config.json";

/// Optional user settings, read from a hand-written file. Every field
/// defaults to the built-in behaviour, so a missing file is the same as an
/// empty one. Nothing here ever writes the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BcdConfig {
    /// Schema version. Missing means current.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_prefix")]
    pub patient_id_prefix: String,
    #[serde(default)]
    pub letterhead: Letterhead,
    /// Where `generate` without a path puts reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for BcdConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            patient_id_prefix: default_prefix(),
            letterhead: Letterhead::default(),
            export_dir: None,
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("org.bcd.screening"))
}

/// Load from the platform config directory, or defaults when there is none.
pub fn load_config() -> eyre::Result<BcdConfig> {
    match dirs::config_dir() {
        Some(_) => load_config_from(&config_dir()?),
        None => {
            tracing::warn!("no config directory found, using defaults");
            Ok(BcdConfig::default())
        }
    }
}

pub fn load_config_from(dir: &Path) -> eyre::Result<BcdConfig> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(BcdConfig::default());
    }
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so the version is checked before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    check_version(&json)?;
    let mut config: BcdConfig = serde_json::from_value(json)?;
    config.config_version = CURRENT_VERSION;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Reject files written by a newer build. Bump [`CURRENT_VERSION`] and add
/// a raw-JSON migration step here when the shape changes.
fn check_version(json: &serde_json::Value) -> eyre::Result<()> {
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    if on_disk_version > u64::from(CURRENT_VERSION) {
        return Err(eyre::eyre!(
            "config_version {on_disk_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update the screening app."
        ));
    }
    Ok(())
}
