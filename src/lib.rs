#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod overlay;
pub mod profile;
pub mod services;
pub mod session;
pub mod types;
pub mod verdict;

// Wiring & plumbing around the core.
pub mod config;
pub mod image;
pub mod runtime;

// --- High-level re-exports -------------------------------------------------

// Main entry points: session machine + detector + verdicts.
pub use crate::detector::{Detector, DetectorOptions};
pub use crate::error::RigError;
pub use crate::profile::{ProfileStore, TrayProfile};
pub use crate::session::{Effect, Event, OperatorAction, Phase, SessionMachine, SessionOptions};
pub use crate::verdict::{map_verdict, TrayVerdict, VerdictOptions, ZoneStatus};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments and demos.
pub mod prelude {
    pub use crate::image::{Frame, ImageU8};
    pub use crate::services::{RawCandidate, VisionService};
    pub use crate::types::{Region, ScoreThresholds, TrayId, ZoneId};
    pub use crate::{
        Effect, Event, OperatorAction, Phase, ProfileStore, SessionMachine, TrayVerdict,
        ZoneStatus,
    };
}
