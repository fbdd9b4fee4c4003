//! Shared core types: identifiers, zone geometry, confidence cutoffs and the
//! per-scan [`Finding`] record produced by the detector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a tray profile (and of the physical tray type it describes).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrayId(pub String);

/// Identifier of a zone, unique within one profile.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub String);

impl fmt::Display for TrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrayId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&str> for ZoneId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Geometric region of a zone in frame pixel coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Region {
    /// Axis-aligned rectangle with top-left corner `(x, y)`.
    Rect { x: f32, y: f32, w: f32, h: f32 },
    /// Circle centred at `(cx, cy)`.
    Circle { cx: f32, cy: f32, r: f32 },
}

impl Region {
    /// Containment test used when partitioning findings into zones.
    /// Boundaries are inclusive.
    pub fn contains(&self, p: [f32; 2]) -> bool {
        match *self {
            Region::Rect { x, y, w, h } => {
                p[0] >= x && p[0] <= x + w && p[1] >= y && p[1] <= y + h
            }
            Region::Circle { cx, cy, r } => {
                let dx = p[0] - cx;
                let dy = p[1] - cy;
                dx * dx + dy * dy <= r * r
            }
        }
    }

    pub fn center(&self) -> [f32; 2] {
        match *self {
            Region::Rect { x, y, w, h } => [x + w * 0.5, y + h * 0.5],
            Region::Circle { cx, cy, .. } => [cx, cy],
        }
    }

    /// Regions collapsed to a point or thinner are rejected at profile load.
    pub fn is_degenerate(&self) -> bool {
        match *self {
            Region::Rect { w, h, .. } => w <= 0.0 || h <= 0.0,
            Region::Circle { r, .. } => r <= 0.0,
        }
    }
}

/// Confidence cutoffs shared by candidate scoring and verdict mapping.
///
/// Illustrative defaults pending real calibration data; both values are
/// overridable from the rig configuration.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreThresholds {
    /// Findings at or above this confidence count towards the expected total.
    pub confirm: f32,
    /// Lower edge of the borderline band `[borderline, confirm)`.
    pub borderline: f32,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            confirm: 0.8,
            borderline: 0.5,
        }
    }
}

/// Scored blob produced fresh on every scan and discarded once a verdict has
/// been computed. Findings have no identity across scans.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Finding {
    /// Blob centre in frame pixel coordinates.
    pub position: [f32; 2],
    pub radius_px: f32,
    /// Blended confidence in `[0, 1]`.
    pub confidence: f32,
    /// Template similarity, present only for zones that carry a logo reference.
    pub logo_score: Option<f32>,
    /// Oversized or irregular blob; must never count as one or more correct
    /// items, whatever its raw score.
    pub anomaly: bool,
}

impl Finding {
    pub fn area(&self) -> f32 {
        std::f32::consts::PI * self.radius_px * self.radius_px
    }
}
