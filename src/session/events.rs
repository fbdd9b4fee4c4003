use crate::diagnostics::{AuditRecord, ScanReport};
use crate::image::Frame;
use crate::overlay::RenderCommand;
use crate::types::TrayId;
use serde::Serialize;
use std::fmt;

/// Operator keypad inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorAction {
    /// Advance to the next tray. Gated on a confirmed verdict and arm
    /// clearance.
    Next,
    /// Rescan the current tray.
    Retry,
    /// Hand the tray to the escalation path.
    Flag,
}

impl fmt::Display for OperatorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperatorAction::Next => "next",
            OperatorAction::Retry => "retry",
            OperatorAction::Flag => "flag",
        })
    }
}

/// Inputs to the session machine. The machine never polls collaborators; it
/// reacts to these and nothing else.
#[derive(Clone, Debug)]
pub enum Event {
    /// Operator selected a tray to verify.
    Start(TrayId),
    /// Capture collaborator delivered a frame for the pending request.
    FrameReady(Frame),
    /// Capture collaborator failed or timed out.
    CaptureFailed(String),
    Operator(OperatorAction),
    /// Interface confirmed the operator's hand/tool is clear of the tray.
    ArmCleared,
    /// Operator acknowledged a flagged-escalation hold.
    EscalationAck,
    /// Overlay collaborator finished presenting the last render command.
    RenderSettled,
    /// Manual reset out of the fault state (also aborts a live session).
    Reset,
}

/// Commands the machine asks its collaborators to perform. Emitted in order;
/// all are fire-and-forget from the machine's perspective.
#[derive(Clone, Debug)]
pub enum Effect {
    /// Ask the capture collaborator for a frame.
    RequestFrame,
    /// Present zone feedback on the tray.
    Render(RenderCommand),
    /// Audible cue; emitted only for a fully confirmed tray.
    Chime,
    /// Append to the session log.
    Audit(AuditRecord),
    /// Scan diagnostics for reporting tools.
    Report(ScanReport),
    /// Operator-facing message.
    Notify(String),
    /// The tray session finished; the rig is ready for the next tray.
    TrayCompleted(TrayId),
}
