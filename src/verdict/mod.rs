//! Verdict mapping: findings + profile → per-zone statuses and one overall
//! tray status, with a fixed severity order.

mod mapper;
mod types;

pub use mapper::map_verdict;
pub use types::{TrayVerdict, VerdictOptions, ZoneStatus, ZoneVerdict};
