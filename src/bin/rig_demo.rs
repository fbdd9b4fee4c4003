//! End-to-end demo: drives one tray through scan → confirm against mock
//! capture/vision/overlay services, printing what the operator would see.
//!
//! Usage: `rig_demo [config.json]`. Without a config a built-in demo profile
//! and synthetic frame are used; with one, profiles come from the configured
//! directory and reports go to its `output.json_out`.

use tray_verifier::config::rig::{load_config, OutputConfig, RigParams};
use tray_verifier::diagnostics::AuditRecord;
use tray_verifier::image::io::{save_frame, write_json_file};
use tray_verifier::image::{Frame, ImageU8};
use tray_verifier::overlay::RenderCommand;
use tray_verifier::profile::{ExpectedItem, LogoRef, TrayProfile};
use tray_verifier::runtime::Runtime;
use tray_verifier::services::{
    CaptureService, LogSink, OperatorNotifier, OverlayRenderer, RawCandidate, VisionService,
};
use tray_verifier::types::{Region, TrayId, ZoneId};
use tray_verifier::{Event, OperatorAction, Phase, ProfileStore, RigError, SessionMachine};

use std::env;
use std::path::PathBuf;

const FRAME_W: usize = 320;
const FRAME_H: usize = 240;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path: Option<PathBuf> = env::args().nth(1).map(PathBuf::from);

    let (mut store, params, output, tray) = match &config_path {
        Some(path) => {
            let config = load_config(path)?;
            let mut store = ProfileStore::open(&config.profiles_dir);
            let tray = store
                .list()
                .map_err(|e| e.to_string())?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    format!("no profiles in {}", config.profiles_dir.display())
                })?;
            (store, config.params, config.output, tray)
        }
        None => (
            ProfileStore::in_memory(vec![demo_profile()]),
            RigParams::default(),
            OutputConfig::default(),
            TrayId::from("demo-tray"),
        ),
    };

    // Simulate a perfectly populated tray for whatever profile we verify.
    let profile = store.load(&tray).map_err(|e| e.to_string())?;
    let candidates = populated_candidates(&profile);
    let frame = synthetic_frame(&candidates);
    if let Some(path) = &output.frame_out {
        save_frame(&frame, path)?;
        println!("Synthetic frame written to {}", path.display());
    }

    let machine = SessionMachine::new(store, DemoVision { candidates }, params);
    let mut runtime = Runtime::new(
        machine,
        DemoCapture { frame },
        ConsoleOverlay,
        ConsoleLog,
        ConsoleNotifier,
    );

    // Scripted operator: start, wait for the verdict, clear the arm, advance.
    runtime
        .dispatch(Event::Start(tray.clone()))
        .map_err(|e| e.to_string())?;

    // "next" before arm clearance must bounce; the rig re-signals instead of
    // advancing.
    match runtime.dispatch(Event::Operator(OperatorAction::Next)) {
        Err(RigError::InvalidOperatorInput { reason, .. }) => {
            println!("next rejected as expected: {reason}");
        }
        Err(e) => return Err(e.to_string()),
        Ok(()) => return Err("next should not be accepted before clearance".to_string()),
    }

    runtime.dispatch(Event::ArmCleared).map_err(|e| e.to_string())?;
    runtime
        .dispatch(Event::Operator(OperatorAction::Next))
        .map_err(|e| e.to_string())?;

    println!();
    for report in &runtime.reports {
        println!(
            "attempt {}: {} finding(s), overall {:?} ({:.2} ms)",
            report.attempt, report.finding_count, report.verdict.status, report.timing.total_ms
        );
        for zone in &report.verdict.zones {
            println!("  zone '{}': {:?}", zone.zone, zone.status);
        }
    }
    println!(
        "completed trays: {:?}, phase {:?}",
        runtime.completed,
        runtime.machine().phase()
    );
    assert_eq!(runtime.machine().phase(), Phase::ConfirmedDone);

    if let Some(path) = &output.json_out {
        write_json_file(path, &runtime.reports)?;
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}

fn demo_profile() -> TrayProfile {
    TrayProfile {
        id: TrayId::from("demo-tray"),
        name: "demo tray".to_string(),
        version: 1,
        items: vec![
            ExpectedItem {
                zone: ZoneId::from("parts"),
                expected: 3,
                region: Region::Rect {
                    x: 40.0,
                    y: 60.0,
                    w: 160.0,
                    h: 120.0,
                },
                logo: None,
            },
            ExpectedItem {
                zone: ZoneId::from("badge"),
                expected: 1,
                region: Region::Circle {
                    cx: 260.0,
                    cy: 120.0,
                    r: 40.0,
                },
                logo: Some(LogoRef("acme-mark".to_string())),
            },
        ],
    }
}

/// One candidate per expected part, spread across each zone's region.
fn populated_candidates(profile: &TrayProfile) -> Vec<RawCandidate> {
    let mut candidates = Vec::new();
    for item in &profile.items {
        let n = item.expected;
        for k in 0..n {
            let t = (k + 1) as f32 / (n + 1) as f32;
            let center = match item.region {
                Region::Rect { x, y, w, h } => [x + w * t, y + h * 0.5],
                Region::Circle { cx, cy, r } => [cx + r * (2.0 * t - 1.0) * 0.6, cy],
            };
            candidates.push(RawCandidate {
                center,
                radius_px: 12.0,
                circularity: 0.93,
            });
        }
    }
    candidates
}

/// Light tray surface with dark discs where the demo candidates sit; sharp
/// edges keep the focus gate happy.
fn synthetic_frame(candidates: &[RawCandidate]) -> Frame {
    let mut data = vec![220u8; FRAME_W * FRAME_H];
    for c in candidates {
        let r = c.radius_px;
        let (cx, cy) = (c.center[0], c.center[1]);
        let x0 = (cx - r).floor().max(0.0) as usize;
        let x1 = ((cx + r).ceil() as usize).min(FRAME_W - 1);
        let y0 = (cy - r).floor().max(0.0) as usize;
        let y1 = ((cy + r).ceil() as usize).min(FRAME_H - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= r * r {
                    data[y * FRAME_W + x] = 30;
                }
            }
        }
    }
    Frame::new(FRAME_W, FRAME_H, data)
}

/// Stands in for the external vision primitives: returns the canned
/// candidates inside the queried region and a fixed logo similarity.
struct DemoVision {
    candidates: Vec<RawCandidate>,
}

impl VisionService for DemoVision {
    fn extract_candidates(
        &self,
        _image: ImageU8<'_>,
        region: &Region,
    ) -> Result<Vec<RawCandidate>, RigError> {
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
        Ok(0.92)
    }
}

struct DemoCapture {
    frame: Frame,
}

impl CaptureService for DemoCapture {
    fn acquire_frame(&mut self) -> Result<Frame, RigError> {
        Ok(self.frame.clone())
    }
}

struct ConsoleOverlay;

impl OverlayRenderer for ConsoleOverlay {
    fn render(&mut self, command: &RenderCommand) {
        for light in &command.lights {
            println!("[OVERLAY] zone '{}' -> {:?}", light.zone, light.color);
        }
        if command.wash {
            println!("[OVERLAY] full-tray green wash");
        }
    }

    fn chime(&mut self) {
        println!("[OVERLAY] *chime*");
    }
}

struct ConsoleLog;

impl LogSink for ConsoleLog {
    fn append(&mut self, record: &AuditRecord) {
        println!(
            "[LOG] {} tray '{}' action {} -> {:?}",
            record.timestamp, record.tray, record.action, record.verdict.status
        );
    }
}

struct ConsoleNotifier;

impl OperatorNotifier for ConsoleNotifier {
    fn notify(&mut self, message: &str) {
        println!("[OPERATOR MESSAGE]: {message}");
    }
}
