use crate::profile::TrayProfile;
use crate::types::{TrayId, ZoneId};
use crate::verdict::TrayVerdict;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Session phases. `Fault` is terminal until an explicit reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Scanning,
    Evaluating,
    AwaitingConfirmation,
    FlaggedEscalation,
    ConfirmedDone,
    Fault,
}

/// Everything the machine tracks for the tray currently under verification.
/// Created on `Start`, dropped wholesale when the operator confirms "next";
/// no tray data survives into the next session.
#[derive(Clone, Debug)]
pub struct ActiveSession {
    pub tray: TrayId,
    pub profile: Arc<TrayProfile>,
    /// Operator retry count per zone that was not confirmed at the time.
    pub retries: HashMap<ZoneId, u32>,
    /// Verdicts of every completed scan attempt for this tray, oldest first.
    pub history: Vec<TrayVerdict>,
    /// Consecutive acquisition failures in the current scanning bout.
    pub capture_attempts: u32,
    /// Completed scan attempts for this tray.
    pub scan_attempts: u32,
    /// Arm-clearance latch; cleared whenever a scan starts.
    pub arm_clear: bool,
}

impl ActiveSession {
    pub(crate) fn new(tray: TrayId, profile: Arc<TrayProfile>) -> Self {
        Self {
            tray,
            profile,
            retries: HashMap::new(),
            history: Vec::new(),
            capture_attempts: 0,
            scan_attempts: 0,
            arm_clear: false,
        }
    }

    pub fn last_verdict(&self) -> Option<&TrayVerdict> {
        self.history.last()
    }
}

/// Machine-owned session state. Mutated only by the transition logic.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub phase: Phase,
    pub active: Option<ActiveSession>,
    /// A render command has been emitted and not yet settled.
    pub render_in_flight: bool,
    /// A frame request is being held back until the render settles.
    pub capture_pending: bool,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::Idle,
            active: None,
            render_in_flight: false,
            capture_pending: false,
        }
    }
}
