//! Mapping from verdicts to projector feedback.
//!
//! The core decides colours only; fading between states and actual pixel
//! rendering belong to the overlay collaborator.

use crate::types::{TrayId, ZoneId};
use crate::verdict::{TrayVerdict, ZoneStatus};
use serde::Serialize;

/// Operator-visible colour states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayColor {
    Green,
    Yellow,
    Red,
}

impl From<ZoneStatus> for OverlayColor {
    fn from(status: ZoneStatus) -> Self {
        match status {
            ZoneStatus::Confirmed => OverlayColor::Green,
            ZoneStatus::Borderline => OverlayColor::Yellow,
            ZoneStatus::Missing | ZoneStatus::Flagged => OverlayColor::Red,
        }
    }
}

/// Colour for one zone.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ZoneLight {
    pub zone: ZoneId,
    pub color: OverlayColor,
}

/// One render instruction for the overlay collaborator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderCommand {
    pub tray: TrayId,
    pub lights: Vec<ZoneLight>,
    /// Full-tray green wash, set only when the overall status is confirmed.
    pub wash: bool,
}

/// Build the render instruction for a verdict.
pub fn render_command(verdict: &TrayVerdict) -> RenderCommand {
    RenderCommand {
        tray: verdict.tray.clone(),
        lights: verdict
            .zones
            .iter()
            .map(|z| ZoneLight {
                zone: z.zone.clone(),
                color: z.status.into(),
            })
            .collect(),
        wash: verdict.is_confirmed(),
    }
}
