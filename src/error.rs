//! Failure taxonomy for the verification core.
//!
//! Every failure is either surfaced to the operator or retried with a bounded
//! counter by the session machine; nothing is swallowed. A failed scan never
//! produces a verdict; absence of a `TrayVerdict` is the only "default".

use crate::session::Phase;
use crate::types::TrayId;
use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum RigError {
    /// No profile document matches the requested tray id. The session stays
    /// idle; a configuration problem, not a scan result.
    #[error("no tray profile matches '{0}'")]
    ProfileNotFound(TrayId),

    /// A profile document exists but fails validation.
    #[error("profile '{tray}' is invalid: {reason}")]
    InvalidProfile { tray: TrayId, reason: String },

    /// Frame capture or vision-service processing failed. Transient; retried
    /// up to the configured limit before the session faults.
    #[error("frame acquisition failed: {0}")]
    Acquisition(String),

    /// An input arrived in a state that does not accept it (e.g. "next"
    /// without arm clearance). The state is unchanged and the operator is
    /// re-signalled; never fatal.
    #[error("input '{input}' rejected in {phase:?}: {reason}")]
    InvalidOperatorInput {
        input: String,
        phase: Phase,
        reason: &'static str,
    },

    /// Profile-store or configuration I/O failure.
    #[error("configuration error: {0}")]
    Config(String),
}
