mod common;

use common::fixtures::{candidate, flat_frame, profile, rect, zone};
use common::mocks::{
    CannedVision, RecordingLog, RecordingNotifier, RecordingOverlay, ScriptedCapture,
};
use tray_verifier::config::rig::RigParams;
use tray_verifier::profile::TrayProfile;
use tray_verifier::runtime::Runtime;
use tray_verifier::services::RawCandidate;
use tray_verifier::types::{TrayId, ZoneId};
use tray_verifier::{
    Effect, Event, OperatorAction, Phase, ProfileStore, RigError, SessionMachine, ZoneStatus,
};

/// Defaults with the focus gate disabled so flat test frames pass.
fn quiet_params() -> RigParams {
    let mut params = RigParams::default();
    params.session.min_focus_measure = 0.0;
    params
}

/// 200x200 frame, two zones: "left" expects 2 parts, "right" expects 1.
fn two_zone_profile() -> TrayProfile {
    profile(
        "tray-a",
        vec![
            zone("left", 2, rect(20.0, 20.0, 80.0, 160.0)),
            zone("right", 1, rect(100.0, 20.0, 80.0, 160.0)),
        ],
    )
}

/// Candidates that fully populate [`two_zone_profile`].
fn full_tray() -> Vec<RawCandidate> {
    vec![
        candidate(40.0, 60.0),
        candidate(70.0, 120.0),
        candidate(140.0, 90.0),
    ]
}

fn machine_with(
    profile: TrayProfile,
    vision: CannedVision,
    params: RigParams,
) -> SessionMachine<CannedVision> {
    SessionMachine::new(ProfileStore::in_memory(vec![profile]), vision, params)
}

fn start(machine: &mut SessionMachine<CannedVision>, tray: &str) -> Vec<Effect> {
    let effects = machine.handle(Event::Start(TrayId::from(tray))).unwrap();
    assert!(
        matches!(effects.as_slice(), [Effect::RequestFrame]),
        "start should request a frame"
    );
    effects
}

/// Run one successful scan: deliver a frame and settle the render.
fn scan(machine: &mut SessionMachine<CannedVision>) -> Vec<Effect> {
    let effects = machine.handle(Event::FrameReady(flat_frame(200, 200))).unwrap();
    assert_eq!(machine.phase(), Phase::AwaitingConfirmation);
    machine.handle(Event::RenderSettled).unwrap();
    effects
}

#[test]
fn happy_path_reaches_confirmed_done() {
    let mut machine = machine_with(
        two_zone_profile(),
        CannedVision::new(full_tray()),
        quiet_params(),
    );

    start(&mut machine, "tray-a");
    let effects = scan(&mut machine);
    assert!(matches!(effects[0], Effect::Report(_)));
    assert!(matches!(effects[1], Effect::Render(_)));
    assert!(
        effects.iter().any(|e| matches!(e, Effect::Chime)),
        "confirmed tray must chime"
    );

    machine.handle(Event::ArmCleared).unwrap();
    let effects = machine.handle(Event::Operator(OperatorAction::Next)).unwrap();
    assert!(matches!(effects[0], Effect::Audit(_)));
    assert!(matches!(effects[1], Effect::TrayCompleted(_)));
    assert_eq!(machine.phase(), Phase::ConfirmedDone);
    assert!(
        machine.state().active.is_none(),
        "tray session data must be dropped on completion"
    );

    // Ready for the next tray without an explicit idle transition.
    start(&mut machine, "tray-a");
    assert_eq!(machine.phase(), Phase::Scanning);
}

#[test]
fn unknown_tray_keeps_the_session_idle() {
    let mut machine = machine_with(
        two_zone_profile(),
        CannedVision::new(full_tray()),
        quiet_params(),
    );
    let err = machine.handle(Event::Start(TrayId::from("missing"))).unwrap_err();
    assert!(matches!(err, RigError::ProfileNotFound(_)), "{err}");
    assert_eq!(machine.phase(), Phase::Idle);
}

#[test]
fn next_is_rejected_until_arm_clearance_arrives() {
    let mut machine = machine_with(
        two_zone_profile(),
        CannedVision::new(full_tray()),
        quiet_params(),
    );
    start(&mut machine, "tray-a");
    scan(&mut machine);

    // Confirmed verdict, but the clearance signal has not arrived.
    let err = machine
        .handle(Event::Operator(OperatorAction::Next))
        .unwrap_err();
    assert!(
        matches!(err, RigError::InvalidOperatorInput { .. }),
        "{err}"
    );
    assert_eq!(machine.phase(), Phase::AwaitingConfirmation);

    // Repeated presses change nothing.
    assert!(machine.handle(Event::Operator(OperatorAction::Next)).is_err());
    assert_eq!(machine.phase(), Phase::AwaitingConfirmation);

    machine.handle(Event::ArmCleared).unwrap();
    machine.handle(Event::Operator(OperatorAction::Next)).unwrap();
    assert_eq!(machine.phase(), Phase::ConfirmedDone);
}

#[test]
fn clearance_does_not_survive_a_rescan() {
    let mut machine = machine_with(
        two_zone_profile(),
        CannedVision::new(full_tray()),
        quiet_params(),
    );
    start(&mut machine, "tray-a");
    scan(&mut machine);

    // Clearance granted, but the operator rescans; the latch must reset.
    machine.handle(Event::ArmCleared).unwrap();
    machine.handle(Event::Operator(OperatorAction::Retry)).unwrap();
    assert_eq!(machine.phase(), Phase::Scanning);
    machine.handle(Event::RenderSettled).unwrap();
    scan(&mut machine);

    let err = machine
        .handle(Event::Operator(OperatorAction::Next))
        .unwrap_err();
    assert!(matches!(err, RigError::InvalidOperatorInput { .. }), "{err}");
    assert_ne!(machine.phase(), Phase::ConfirmedDone);
}

#[test]
fn next_is_rejected_when_the_verdict_is_not_confirmed() {
    // Only one of two expected parts in the left zone.
    let mut machine = machine_with(
        two_zone_profile(),
        CannedVision::new(vec![candidate(40.0, 60.0), candidate(140.0, 90.0)]),
        quiet_params(),
    );
    start(&mut machine, "tray-a");
    scan(&mut machine);
    machine.handle(Event::ArmCleared).unwrap();

    let err = machine
        .handle(Event::Operator(OperatorAction::Next))
        .unwrap_err();
    assert!(matches!(err, RigError::InvalidOperatorInput { .. }), "{err}");
    assert_eq!(machine.phase(), Phase::AwaitingConfirmation);
}

#[test]
fn three_capture_failures_fault_the_session_without_a_verdict() {
    let mut machine = machine_with(
        two_zone_profile(),
        CannedVision::new(full_tray()),
        quiet_params(),
    );
    start(&mut machine, "tray-a");

    for attempt in 1..=2u32 {
        let effects = machine
            .handle(Event::CaptureFailed(format!("timeout {attempt}")))
            .unwrap();
        assert!(
            matches!(effects.as_slice(), [Effect::RequestFrame]),
            "attempt {attempt} should retry"
        );
        assert_eq!(machine.phase(), Phase::Scanning);
    }

    let effects = machine
        .handle(Event::CaptureFailed("timeout 3".to_string()))
        .unwrap();
    assert!(matches!(effects.as_slice(), [Effect::Notify(_)]));
    assert_eq!(machine.phase(), Phase::Fault);
    let active = machine.state().active.as_ref().unwrap();
    assert!(active.history.is_empty(), "no verdict may be emitted");

    // Late frames are dropped, not evaluated.
    let effects = machine
        .handle(Event::FrameReady(flat_frame(200, 200)))
        .unwrap();
    assert!(effects.is_empty());
    assert_eq!(machine.phase(), Phase::Fault);

    // Manual reset returns to idle.
    machine.handle(Event::Reset).unwrap();
    assert_eq!(machine.phase(), Phase::Idle);
    assert!(machine.state().active.is_none());
}

#[test]
fn vision_failure_counts_as_an_acquisition_retry() {
    let mut machine = machine_with(
        two_zone_profile(),
        CannedVision::failing(),
        quiet_params(),
    );
    start(&mut machine, "tray-a");

    let effects = machine
        .handle(Event::FrameReady(flat_frame(200, 200)))
        .unwrap();
    assert!(
        matches!(effects.as_slice(), [Effect::RequestFrame]),
        "detector failure should re-request a frame"
    );
    assert_eq!(machine.phase(), Phase::Scanning);
    let active = machine.state().active.as_ref().unwrap();
    assert_eq!(active.capture_attempts, 1);
    assert!(active.history.is_empty());
}

#[test]
fn blurred_frames_are_rejected_by_the_focus_gate() {
    // Default params keep the 9.0 focus gate; a flat frame measures 0.
    let mut machine = machine_with(
        two_zone_profile(),
        CannedVision::new(full_tray()),
        RigParams::default(),
    );
    start(&mut machine, "tray-a");

    let effects = machine
        .handle(Event::FrameReady(flat_frame(200, 200)))
        .unwrap();
    assert!(matches!(effects.as_slice(), [Effect::RequestFrame]));
    assert_eq!(machine.phase(), Phase::Scanning);
    assert!(machine.state().active.as_ref().unwrap().history.is_empty());
}

#[test]
fn retry_increments_counters_for_unconfirmed_zones_only() {
    // Right zone stays empty; left zone is fully populated.
    let mut machine = machine_with(
        two_zone_profile(),
        CannedVision::new(vec![candidate(40.0, 60.0), candidate(70.0, 120.0)]),
        quiet_params(),
    );
    start(&mut machine, "tray-a");
    scan(&mut machine);

    let verdict = machine
        .state()
        .active
        .as_ref()
        .unwrap()
        .last_verdict()
        .unwrap()
        .clone();
    assert_eq!(verdict.zone(&"left".into()).unwrap().status, ZoneStatus::Confirmed);
    assert_eq!(verdict.zone(&"right".into()).unwrap().status, ZoneStatus::Missing);

    let effects = machine.handle(Event::Operator(OperatorAction::Retry)).unwrap();
    assert!(matches!(effects[0], Effect::Audit(_)));
    assert_eq!(machine.phase(), Phase::Scanning);

    let active = machine.state().active.as_ref().unwrap();
    assert_eq!(active.retries.get(&ZoneId::from("right")), Some(&1));
    assert_eq!(active.retries.get(&ZoneId::from("left")), None);
}

#[test]
fn scanning_defers_the_frame_request_while_a_render_is_in_flight() {
    let mut machine = machine_with(
        two_zone_profile(),
        CannedVision::new(full_tray()),
        quiet_params(),
    );
    start(&mut machine, "tray-a");

    // Verdict computed; the render command is still in flight.
    let effects = machine
        .handle(Event::FrameReady(flat_frame(200, 200)))
        .unwrap();
    assert!(effects.iter().any(|e| matches!(e, Effect::Render(_))));

    // Operator retries before the overlay settles: the audit is emitted but
    // no frame request may go out yet.
    let effects = machine.handle(Event::Operator(OperatorAction::Retry)).unwrap();
    assert!(matches!(effects.as_slice(), [Effect::Audit(_)]));
    assert_eq!(machine.phase(), Phase::Scanning);

    // Settlement releases the deferred request.
    let effects = machine.handle(Event::RenderSettled).unwrap();
    assert!(matches!(effects.as_slice(), [Effect::RequestFrame]));
}

#[test]
fn flagging_holds_until_acknowledged_then_rescans() {
    let mut machine = machine_with(
        two_zone_profile(),
        CannedVision::new(full_tray()),
        quiet_params(),
    );
    start(&mut machine, "tray-a");
    scan(&mut machine);

    let effects = machine.handle(Event::Operator(OperatorAction::Flag)).unwrap();
    assert!(matches!(effects[0], Effect::Audit(_)));
    assert_eq!(machine.phase(), Phase::FlaggedEscalation);

    // Operator input is not accepted while the hold is active.
    assert!(machine.handle(Event::Operator(OperatorAction::Next)).is_err());

    let effects = machine.handle(Event::EscalationAck).unwrap();
    assert!(matches!(effects.as_slice(), [Effect::RequestFrame]));
    assert_eq!(machine.phase(), Phase::Scanning);
}

#[test]
fn next_and_retry_are_rejected_while_scanning() {
    let mut machine = machine_with(
        two_zone_profile(),
        CannedVision::new(full_tray()),
        quiet_params(),
    );
    start(&mut machine, "tray-a");
    for action in [OperatorAction::Next, OperatorAction::Retry] {
        let err = machine.handle(Event::Operator(action)).unwrap_err();
        assert!(matches!(err, RigError::InvalidOperatorInput { .. }), "{err}");
        assert_eq!(machine.phase(), Phase::Scanning);
    }
}

#[test]
fn flag_cancels_a_scan_in_progress() {
    let mut machine = machine_with(
        two_zone_profile(),
        CannedVision::new(full_tray()),
        quiet_params(),
    );
    start(&mut machine, "tray-a");

    // No verdict yet, so the flag carries no audit record.
    let effects = machine.handle(Event::Operator(OperatorAction::Flag)).unwrap();
    assert!(matches!(effects.as_slice(), [Effect::Notify(_)]));
    assert_eq!(machine.phase(), Phase::FlaggedEscalation);

    // The capture that was in flight comes back stale and is dropped whole;
    // no partial evaluation happens.
    let effects = machine
        .handle(Event::FrameReady(flat_frame(200, 200)))
        .unwrap();
    assert!(effects.is_empty());
    assert!(machine.state().active.as_ref().unwrap().history.is_empty());

    let effects = machine.handle(Event::EscalationAck).unwrap();
    assert!(matches!(effects.as_slice(), [Effect::RequestFrame]));
    assert_eq!(machine.phase(), Phase::Scanning);
}

#[test]
fn runtime_drives_a_full_cycle_through_the_service_seams() {
    let machine = machine_with(
        two_zone_profile(),
        CannedVision::new(full_tray()),
        quiet_params(),
    );
    let mut runtime = Runtime::new(
        machine,
        ScriptedCapture::frames(vec![flat_frame(200, 200)]),
        RecordingOverlay::default(),
        RecordingLog::default(),
        RecordingNotifier::default(),
    );

    runtime.dispatch(Event::Start(TrayId::from("tray-a"))).unwrap();
    assert_eq!(runtime.machine().phase(), Phase::AwaitingConfirmation);
    assert_eq!(runtime.reports.len(), 1);
    assert_eq!(runtime.reports[0].verdict.status, ZoneStatus::Confirmed);

    runtime.dispatch(Event::ArmCleared).unwrap();
    runtime
        .dispatch(Event::Operator(OperatorAction::Next))
        .unwrap();
    assert_eq!(runtime.completed, vec![TrayId::from("tray-a")]);
    assert_eq!(runtime.machine().phase(), Phase::ConfirmedDone);
}
