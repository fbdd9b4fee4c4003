//! Option types configuring candidate scoring and anomaly screening.
//!
//! Defaults carry the design values; all of them are tunables, overridable
//! from the rig configuration, pending calibration against real trays.

use serde::{Deserialize, Serialize};

/// Knobs for the scoring stage of [`crate::detector::Detector`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorOptions {
    /// Candidates whose extent crosses within this many pixels of the frame
    /// border are dropped before scoring.
    pub edge_margin_px: f32,
    /// Area above `factor × median candidate area` marks a blob oversized.
    pub oversized_area_factor: f32,
    /// Radius further than this many standard deviations from the scan mean
    /// marks a blob irregular (out-of-position or touching parts).
    pub size_outlier_sigma: f32,
    /// Relative radius deviation from the scan mean at which the size score
    /// bottoms out.
    pub size_tolerance: f32,
    /// Circularity below this marks a blob irregular.
    pub min_circularity: f32,
    /// Weight of the size-agreement component in the confidence blend.
    pub size_weight: f32,
    /// Weight of the shape-regularity component.
    pub shape_weight: f32,
    /// Weight of the logo-similarity component (zones with a logo reference).
    pub logo_weight: f32,
    /// Anomalous blobs are clamped this far below the borderline cutoff.
    pub anomaly_margin: f32,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            edge_margin_px: 10.0,
            oversized_area_factor: 1.5,
            size_outlier_sigma: 2.0,
            size_tolerance: 0.25,
            min_circularity: 0.6,
            size_weight: 0.4,
            shape_weight: 0.3,
            logo_weight: 0.3,
            anomaly_margin: 0.05,
        }
    }
}
