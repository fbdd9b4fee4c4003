//! Mock collaborator services recording what the core asked of them.

use std::collections::VecDeque;
use tray_verifier::diagnostics::AuditRecord;
use tray_verifier::image::{Frame, ImageU8};
use tray_verifier::overlay::RenderCommand;
use tray_verifier::profile::LogoRef;
use tray_verifier::services::{
    CaptureService, LogSink, OperatorNotifier, OverlayRenderer, RawCandidate, VisionService,
};
use tray_verifier::types::Region;
use tray_verifier::RigError;

/// Vision stub: returns the canned candidates inside the queried region, or
/// fails every call when `fail` is set.
pub struct CannedVision {
    pub candidates: Vec<RawCandidate>,
    pub logo_score: f32,
    pub fail: bool,
}

impl CannedVision {
    pub fn new(candidates: Vec<RawCandidate>) -> Self {
        Self {
            candidates,
            logo_score: 0.9,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            candidates: vec![],
            logo_score: 0.0,
            fail: true,
        }
    }
}

impl VisionService for CannedVision {
    fn extract_candidates(
        &self,
        _image: ImageU8<'_>,
        region: &Region,
    ) -> Result<Vec<RawCandidate>, RigError> {
        if self.fail {
            return Err(RigError::Acquisition("corrupt frame".to_string()));
        }
        Ok(self
            .candidates
            .iter()
            .copied()
            .filter(|c| region.contains(c.center))
            .collect())
    }

    fn logo_similarity(
        &self,
        _image: ImageU8<'_>,
        _candidate: &RawCandidate,
        _logo: &LogoRef,
    ) -> Result<f32, RigError> {
        Ok(self.logo_score)
    }
}

/// Capture stub handing out queued outcomes, failing once the queue is empty.
pub struct ScriptedCapture {
    pub outcomes: VecDeque<Result<Frame, RigError>>,
}

impl ScriptedCapture {
    pub fn frames(frames: Vec<Frame>) -> Self {
        Self {
            outcomes: frames.into_iter().map(Ok).collect(),
        }
    }
}

impl CaptureService for ScriptedCapture {
    fn acquire_frame(&mut self) -> Result<Frame, RigError> {
        self.outcomes
            .pop_front()
            .unwrap_or_else(|| Err(RigError::Acquisition("capture script exhausted".to_string())))
    }
}

#[derive(Default)]
pub struct RecordingOverlay {
    pub commands: Vec<RenderCommand>,
    pub chimes: usize,
}

impl OverlayRenderer for RecordingOverlay {
    fn render(&mut self, command: &RenderCommand) {
        self.commands.push(command.clone());
    }

    fn chime(&mut self) {
        self.chimes += 1;
    }
}

#[derive(Default)]
pub struct RecordingLog {
    pub records: Vec<AuditRecord>,
}

impl LogSink for RecordingLog {
    fn append(&mut self, record: &AuditRecord) {
        self.records.push(record.clone());
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Vec<String>,
}

impl OperatorNotifier for RecordingNotifier {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
