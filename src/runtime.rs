//! Cooperative single-threaded driver wiring the machine to its services.
//!
//! `dispatch` feeds one external event to the machine and then performs the
//! resulting effects, queueing any follow-up events (frame delivery, render
//! settlement) in FIFO order until the cycle quiesces. This is the whole
//! scheduling model: one session, one thread, suspension only at the seams.

use crate::diagnostics::ScanReport;
use crate::error::RigError;
use crate::services::{CaptureService, LogSink, OperatorNotifier, OverlayRenderer, VisionService};
use crate::session::{Effect, Event, SessionMachine};
use crate::types::TrayId;
use log::debug;
use std::collections::VecDeque;

pub struct Runtime<V, C, O, L, N> {
    machine: SessionMachine<V>,
    capture: C,
    overlay: O,
    log: L,
    notifier: N,
    /// Scan reports collected for the caller, oldest first.
    pub reports: Vec<ScanReport>,
    /// Trays confirmed complete, in order.
    pub completed: Vec<TrayId>,
}

impl<V, C, O, L, N> Runtime<V, C, O, L, N>
where
    V: VisionService + Sync,
    C: CaptureService,
    O: OverlayRenderer,
    L: LogSink,
    N: OperatorNotifier,
{
    pub fn new(machine: SessionMachine<V>, capture: C, overlay: O, log: L, notifier: N) -> Self {
        Self {
            machine,
            capture,
            overlay,
            log,
            notifier,
            reports: Vec::new(),
            completed: Vec::new(),
        }
    }

    pub fn machine(&self) -> &SessionMachine<V> {
        &self.machine
    }

    /// Feed one external event and run the cycle it triggers to quiescence.
    /// A rejected event surfaces as `Err` with the machine state unchanged.
    pub fn dispatch(&mut self, event: Event) -> Result<(), RigError> {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let effects = self.machine.handle(event)?;
            for effect in effects {
                self.perform(effect, &mut queue);
            }
        }
        Ok(())
    }

    fn perform(&mut self, effect: Effect, queue: &mut VecDeque<Event>) {
        match effect {
            Effect::RequestFrame => match self.capture.acquire_frame() {
                Ok(frame) => queue.push_back(Event::FrameReady(frame)),
                Err(e) => queue.push_back(Event::CaptureFailed(e.to_string())),
            },
            Effect::Render(command) => {
                self.overlay.render(&command);
                // The synchronous renderer settles immediately; an async one
                // would deliver this event from its completion callback.
                queue.push_back(Event::RenderSettled);
            }
            Effect::Chime => self.overlay.chime(),
            Effect::Audit(record) => self.log.append(&record),
            Effect::Report(report) => {
                debug!(
                    "Runtime: scan attempt {} of '{}' -> {:?}",
                    report.attempt, report.tray, report.verdict.status
                );
                self.reports.push(report);
            }
            Effect::Notify(message) => self.notifier.notify(&message),
            Effect::TrayCompleted(tray) => self.completed.push(tray),
        }
    }
}
