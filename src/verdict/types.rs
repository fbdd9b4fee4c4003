use crate::types::{TrayId, ZoneId};
use serde::{Deserialize, Serialize};

/// Per-zone (and overall) status. Variant order is severity order:
/// `Flagged > Missing > Borderline > Confirmed`, so `Ord::max` picks the
/// most severe status present.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ZoneStatus {
    Confirmed,
    Borderline,
    Missing,
    Flagged,
}

/// Status of one zone plus the findings that produced it. Findings are
/// referenced by index into the scan's finding list; the verdict owns
/// nothing and is discarded with the scan.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ZoneVerdict {
    pub zone: ZoneId,
    pub status: ZoneStatus,
    /// Indices into the findings slice handed to the mapper.
    pub findings: Vec<usize>,
}

/// Aggregate verdict for one scan attempt.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrayVerdict {
    pub tray: TrayId,
    /// Most severe zone status present; `Confirmed` only when every zone is.
    pub status: ZoneStatus,
    pub zones: Vec<ZoneVerdict>,
}

impl TrayVerdict {
    pub fn is_confirmed(&self) -> bool {
        self.status == ZoneStatus::Confirmed
    }

    pub fn zone(&self, zone: &ZoneId) -> Option<&ZoneVerdict> {
        self.zones.iter().find(|z| &z.zone == zone)
    }
}

/// Knobs for the verdict mapper.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdictOptions {
    /// A qualifying count within this distance of the expected count reads as
    /// borderline, provided a near-miss finding backs it up.
    pub borderline_margin: u32,
}

impl Default for VerdictOptions {
    fn default() -> Self {
        Self {
            borderline_margin: 1,
        }
    }
}
