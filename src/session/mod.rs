//! Session orchestration: the scan → evaluate → confirm/retry/flag cycle as
//! an explicit state machine with guarded transitions.
//!
//! Modules
//! - `events` – [`Event`] inputs and [`Effect`] outputs.
//! - `state` – [`SessionState`] and the per-tray [`ActiveSession`] data.
//! - `machine` – the [`SessionMachine`] transition logic.

mod events;
mod machine;
mod state;

pub use events::{Effect, Event, OperatorAction};
pub use machine::{SessionMachine, SessionOptions};
pub use state::{ActiveSession, Phase, SessionState};
