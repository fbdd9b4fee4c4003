//! Collaborator seams around the verification core.
//!
//! The core never talks to hardware directly: frames, raw blob candidates,
//! projector output and log persistence all arrive through these traits.
//! Production implementations wrap device drivers; tests and demos use the
//! mocks shipped alongside them.

use crate::error::RigError;
use crate::diagnostics::AuditRecord;
use crate::image::{Frame, ImageU8};
use crate::overlay::RenderCommand;
use crate::profile::LogoRef;
use crate::types::Region;
use serde::{Deserialize, Serialize};

/// Raw blob candidate as reported by the vision primitive service: position,
/// size and a shape descriptor. Scoring happens in the detector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Blob centre in frame pixel coordinates.
    pub center: [f32; 2],
    pub radius_px: f32,
    /// Shape regularity in `[0, 1]`; 1 is a perfect disc.
    pub circularity: f32,
}

/// Vision primitives supplied by an external service. Both operations must be
/// deterministic for a given frame, so that `detect` is reproducible.
pub trait VisionService {
    /// Extract raw candidates inside `region`. A corrupt or unprocessable
    /// frame fails with [`RigError::Acquisition`].
    fn extract_candidates(
        &self,
        image: ImageU8<'_>,
        region: &Region,
    ) -> Result<Vec<RawCandidate>, RigError>;

    /// Similarity in `[0, 1]` between the blob at `candidate` and the
    /// referenced logo template.
    fn logo_similarity(
        &self,
        image: ImageU8<'_>,
        candidate: &RawCandidate,
        logo: &LogoRef,
    ) -> Result<f32, RigError>;
}

/// Camera-side frame source.
pub trait CaptureService {
    fn acquire_frame(&mut self) -> Result<Frame, RigError>;
}

/// Projector-side feedback surface. `render` is fire-and-forget; colour fade
/// timing is the renderer's concern.
pub trait OverlayRenderer {
    fn render(&mut self, command: &RenderCommand);
    /// Audible cue, sounded only for a fully confirmed tray.
    fn chime(&mut self);
}

/// Append-only session log. Fire-and-forget from the core's perspective.
pub trait LogSink {
    fn append(&mut self, record: &AuditRecord);
}

/// Operator-facing message channel (screen, console, ...).
pub trait OperatorNotifier {
    fn notify(&mut self, message: &str);
}
