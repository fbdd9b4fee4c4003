//! The scan/verify session machine.
//!
//! A synchronous Mealy machine: feed it one [`Event`], get back the effects
//! collaborators should perform. Detection and verdict mapping run to
//! completion inside `handle` (both are pure and non-blocking); the only
//! operations that suspend (frame capture and operator input) live outside
//! and come back as events.
//!
//! Guard rules worth calling out:
//! - "next" requires a confirmed overall verdict AND a fresh arm-clearance
//!   signal; the latch is cleared on every scan start.
//! - acquisition failures (including out-of-focus frames) retry up to the
//!   configured limit, then the machine faults until a manual reset.
//! - a frame request is deferred while a render is still in flight; operator
//!   input is accepted in the meantime.
//! - a failed scan attempt leaves no partial verdict behind.

use super::events::{Effect, Event, OperatorAction};
use super::state::{ActiveSession, Phase, SessionState};
use crate::config::rig::RigParams;
use crate::detector::focus::focus_measure;
use crate::detector::Detector;
use crate::diagnostics::{AuditRecord, ScanReport, TimingBreakdown};
use crate::error::RigError;
use crate::image::Frame;
use crate::overlay::render_command;
use crate::profile::ProfileStore;
use crate::services::VisionService;
use crate::types::{ScoreThresholds, TrayId};
use crate::verdict::{map_verdict, TrayVerdict, VerdictOptions, ZoneStatus};
use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Knobs for the session cycle.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Consecutive acquisition failures tolerated before the session faults.
    pub capture_retry_limit: u32,
    /// Frames whose Laplacian-variance focus measure falls below this are
    /// rejected as transient failures. Non-positive disables the gate.
    pub min_focus_measure: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            capture_retry_limit: 3,
            min_focus_measure: 9.0,
        }
    }
}

/// Drives one tray at a time through scan → evaluate → confirm/retry/flag.
pub struct SessionMachine<V> {
    profiles: ProfileStore,
    detector: Detector<V>,
    thresholds: ScoreThresholds,
    verdict_options: VerdictOptions,
    options: SessionOptions,
    state: SessionState,
}

impl<V: VisionService + Sync> SessionMachine<V> {
    pub fn new(profiles: ProfileStore, vision: V, params: RigParams) -> Self {
        Self {
            profiles,
            detector: Detector::new(vision, params.thresholds, params.detector),
            thresholds: params.thresholds,
            verdict_options: params.verdict,
            options: params.session,
            state: SessionState::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Apply one event. Returns the effects to perform, or an error when the
    /// event is rejected, in which case the state is unchanged and the
    /// caller re-signals the operator.
    pub fn handle(&mut self, event: Event) -> Result<Vec<Effect>, RigError> {
        match event {
            Event::Start(tray) => self.on_start(tray),
            Event::FrameReady(frame) => self.on_frame(frame),
            Event::CaptureFailed(reason) => self.on_capture_failed(reason),
            Event::Operator(action) => self.on_operator(action),
            Event::ArmCleared => self.on_arm_cleared(),
            Event::EscalationAck => self.on_escalation_ack(),
            Event::RenderSettled => self.on_render_settled(),
            Event::Reset => self.on_reset(),
        }
    }

    fn on_start(&mut self, tray: TrayId) -> Result<Vec<Effect>, RigError> {
        match self.state.phase {
            Phase::Idle | Phase::ConfirmedDone => {}
            phase => {
                return Err(RigError::InvalidOperatorInput {
                    input: format!("start {tray}"),
                    phase,
                    reason: "a tray session is already active",
                })
            }
        }
        // ProfileNotFound propagates here and the session stays idle.
        let profile = self.profiles.load(&tray)?;
        debug!("Session: starting tray '{tray}'");
        self.state.active = Some(ActiveSession::new(tray, profile));
        Ok(self.begin_scan())
    }

    fn on_frame(&mut self, frame: Frame) -> Result<Vec<Effect>, RigError> {
        if self.state.phase != Phase::Scanning {
            debug!("Session: stale frame dropped in {:?}", self.state.phase);
            return Ok(vec![]);
        }
        let Some(mut active) = self.state.active.take() else {
            debug!("Session: frame with no active tray dropped");
            return Ok(vec![]);
        };

        let mut timing = TimingBreakdown::default();
        let total_start = Instant::now();

        let stage = Instant::now();
        let measure = focus_measure(frame.as_view());
        timing.push("focus", elapsed_ms(stage));
        if self.options.min_focus_measure > 0.0 && measure < self.options.min_focus_measure {
            self.state.active = Some(active);
            return Ok(self.scan_failure(format!("frame out of focus (measure {measure:.2})")));
        }

        self.set_phase(Phase::Evaluating);
        let stage = Instant::now();
        let findings = match self.detector.detect(frame.as_view(), &active.profile) {
            Ok(findings) => findings,
            Err(RigError::Acquisition(reason)) => {
                // All-or-nothing: nothing of this attempt reaches the history.
                self.state.active = Some(active);
                self.set_phase(Phase::Scanning);
                return Ok(self.scan_failure(reason));
            }
            Err(other) => {
                self.state.active = Some(active);
                self.set_phase(Phase::Scanning);
                return Err(other);
            }
        };
        timing.push("detect", elapsed_ms(stage));

        let stage = Instant::now();
        let verdict = map_verdict(
            &findings,
            &active.profile,
            &self.thresholds,
            &self.verdict_options,
        );
        timing.push("map", elapsed_ms(stage));
        timing.total_ms = elapsed_ms(total_start);

        active.scan_attempts += 1;
        active.capture_attempts = 0;
        active.history.push(verdict.clone());

        let found = findings.len();
        let expected = active.profile.total_expected();
        let report = ScanReport {
            tray: active.tray.clone(),
            attempt: active.scan_attempts,
            finding_count: found,
            verdict: verdict.clone(),
            timing,
        };

        let mut effects = vec![
            Effect::Report(report),
            Effect::Render(render_command(&verdict)),
        ];
        self.state.render_in_flight = true;
        if verdict.is_confirmed() {
            effects.push(Effect::Chime);
        }
        effects.push(Effect::Notify(format!(
            "Found: {found}, Expected: {expected}, Difference: {}",
            expected as i64 - found as i64
        )));

        self.state.active = Some(active);
        self.set_phase(Phase::AwaitingConfirmation);
        Ok(effects)
    }

    fn on_capture_failed(&mut self, reason: String) -> Result<Vec<Effect>, RigError> {
        if self.state.phase != Phase::Scanning {
            debug!("Session: stale capture failure in {:?}", self.state.phase);
            return Ok(vec![]);
        }
        Ok(self.scan_failure(reason))
    }

    fn on_operator(&mut self, action: OperatorAction) -> Result<Vec<Effect>, RigError> {
        match (self.state.phase, action) {
            (Phase::AwaitingConfirmation, OperatorAction::Next) => self.on_next(),
            (Phase::AwaitingConfirmation, OperatorAction::Retry) => self.on_retry(),
            // Flagging also cancels a scan in progress; whatever capture is in
            // flight will come back stale and be dropped.
            (Phase::AwaitingConfirmation | Phase::Scanning, OperatorAction::Flag) => {
                self.on_flag()
            }
            _ => Err(self.reject(action, "not accepted in this state")),
        }
    }

    fn on_next(&mut self) -> Result<Vec<Effect>, RigError> {
        let Some(active) = self.state.active.as_ref() else {
            return Err(self.reject(OperatorAction::Next, "no active tray"));
        };
        let Some(verdict) = active.last_verdict() else {
            return Err(self.reject(OperatorAction::Next, "no verdict recorded"));
        };
        if !verdict.is_confirmed() {
            return Err(self.reject(OperatorAction::Next, "overall status is not confirmed"));
        }
        if !active.arm_clear {
            // Clearance-before-advance: block until the interface confirms the
            // operator's arm is out of the tray.
            return Err(self.reject(OperatorAction::Next, "arm clearance not confirmed"));
        }

        let record = audit(active.tray.clone(), verdict.clone(), OperatorAction::Next);
        let tray = active.tray.clone();
        debug!("Session: tray '{tray}' confirmed complete");
        self.state.active = None;
        self.set_phase(Phase::ConfirmedDone);
        Ok(vec![Effect::Audit(record), Effect::TrayCompleted(tray)])
    }

    fn on_retry(&mut self) -> Result<Vec<Effect>, RigError> {
        let record = {
            let Some(active) = self.state.active.as_mut() else {
                return Err(self.reject(OperatorAction::Retry, "no active tray"));
            };
            let Some(verdict) = active.history.last().cloned() else {
                return Err(self.reject(OperatorAction::Retry, "no verdict recorded"));
            };
            for zone in &verdict.zones {
                if zone.status != ZoneStatus::Confirmed {
                    *active.retries.entry(zone.zone.clone()).or_insert(0) += 1;
                }
            }
            audit(active.tray.clone(), verdict, OperatorAction::Retry)
        };
        let mut effects = vec![Effect::Audit(record)];
        effects.extend(self.begin_scan());
        Ok(effects)
    }

    fn on_flag(&mut self) -> Result<Vec<Effect>, RigError> {
        let Some(active) = self.state.active.as_ref() else {
            return Err(self.reject(OperatorAction::Flag, "no active tray"));
        };
        let mut effects = Vec::new();
        // A flag during scanning has no verdict of its own to record; earlier
        // attempts, if any, are already in the history.
        if let Some(verdict) = active.last_verdict() {
            effects.push(Effect::Audit(audit(
                active.tray.clone(),
                verdict.clone(),
                OperatorAction::Flag,
            )));
        }
        self.set_phase(Phase::FlaggedEscalation);
        self.state.capture_pending = false;
        effects.push(Effect::Notify(
            "Tray flagged for escalation; acknowledge to rescan.".to_string(),
        ));
        Ok(effects)
    }

    fn on_arm_cleared(&mut self) -> Result<Vec<Effect>, RigError> {
        match self.state.active.as_mut() {
            Some(active) => {
                active.arm_clear = true;
                debug!("Session: arm clearance confirmed");
            }
            None => debug!("Session: arm clearance with no active tray ignored"),
        }
        Ok(vec![])
    }

    fn on_escalation_ack(&mut self) -> Result<Vec<Effect>, RigError> {
        if self.state.phase != Phase::FlaggedEscalation {
            return Err(RigError::InvalidOperatorInput {
                input: "escalation ack".to_string(),
                phase: self.state.phase,
                reason: "no escalation to acknowledge",
            });
        }
        Ok(self.begin_scan())
    }

    fn on_render_settled(&mut self) -> Result<Vec<Effect>, RigError> {
        self.state.render_in_flight = false;
        if self.state.capture_pending && self.state.phase == Phase::Scanning {
            self.state.capture_pending = false;
            debug!("Session: render settled, releasing deferred frame request");
            return Ok(vec![Effect::RequestFrame]);
        }
        self.state.capture_pending = false;
        Ok(vec![])
    }

    fn on_reset(&mut self) -> Result<Vec<Effect>, RigError> {
        debug!("Session: reset from {:?}", self.state.phase);
        self.state.active = None;
        self.state.capture_pending = false;
        self.set_phase(Phase::Idle);
        Ok(vec![])
    }

    /// Enter (or re-enter) scanning: fresh clearance, fresh failure counter.
    fn begin_scan(&mut self) -> Vec<Effect> {
        if let Some(active) = self.state.active.as_mut() {
            active.arm_clear = false;
            active.capture_attempts = 0;
        }
        self.set_phase(Phase::Scanning);
        self.request_frame()
    }

    fn request_frame(&mut self) -> Vec<Effect> {
        if self.state.render_in_flight {
            debug!("Session: render in flight, deferring frame request");
            self.state.capture_pending = true;
            vec![]
        } else {
            vec![Effect::RequestFrame]
        }
    }

    fn scan_failure(&mut self, reason: String) -> Vec<Effect> {
        let limit = self.options.capture_retry_limit;
        let attempts = match self.state.active.as_mut() {
            Some(active) => {
                active.capture_attempts += 1;
                active.capture_attempts
            }
            None => return vec![],
        };
        if attempts >= limit {
            warn!("Session: acquisition failed ({reason}); attempt {attempts}/{limit}, faulting");
            self.set_phase(Phase::Fault);
            vec![Effect::Notify(format!(
                "Scanning failed after {attempts} attempts ({reason}); manual reset required."
            ))]
        } else {
            warn!("Session: acquisition failed ({reason}); attempt {attempts}/{limit}, retrying");
            self.request_frame()
        }
    }

    fn reject(&self, action: OperatorAction, reason: &'static str) -> RigError {
        RigError::InvalidOperatorInput {
            input: action.to_string(),
            phase: self.state.phase,
            reason,
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.state.phase != phase {
            debug!("Session: {:?} -> {:?}", self.state.phase, phase);
            self.state.phase = phase;
        }
    }
}

fn audit(tray: TrayId, verdict: TrayVerdict, action: OperatorAction) -> AuditRecord {
    AuditRecord {
        timestamp: Utc::now(),
        tray,
        verdict,
        action,
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
