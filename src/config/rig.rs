//! Rig configuration: one JSON document aggregating every tunable.

use crate::detector::DetectorOptions;
use crate::session::SessionOptions;
use crate::types::ScoreThresholds;
use crate::verdict::VerdictOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Every tunable parameter of the verification core. Each section has design
/// defaults, so a config file may override any subset.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RigParams {
    pub thresholds: ScoreThresholds,
    pub detector: DetectorOptions,
    pub verdict: VerdictOptions,
    pub session: SessionOptions,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where demo tools write their JSON scan reports.
    pub json_out: Option<PathBuf>,
    /// Where demo tools dump the scanned frame as a PNG.
    pub frame_out: Option<PathBuf>,
}

/// Top-level rig configuration document.
#[derive(Clone, Debug, Deserialize)]
pub struct RigConfig {
    /// Directory of `<trayId>.json` profile documents.
    pub profiles_dir: PathBuf,
    #[serde(default)]
    pub params: RigParams,
    #[serde(default)]
    pub output: OutputConfig,
}

pub fn load_config(path: &Path) -> Result<RigConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RigConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}
