//! Scan reports and audit records.
//!
//! Reports are operator/engineering-facing diagnostics for one scan attempt;
//! audit records are the append-only tuples handed to the session log sink.

mod timing;

pub use timing::{StageTiming, TimingBreakdown};

use crate::session::OperatorAction;
use crate::types::TrayId;
use crate::verdict::TrayVerdict;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Diagnostics for one completed scan attempt.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub tray: TrayId,
    /// 1-based scan attempt within the current tray session.
    pub attempt: u32,
    pub finding_count: usize,
    pub verdict: TrayVerdict,
    pub timing: TimingBreakdown,
}

/// Append-only record handed to the session log sink whenever an operator
/// action is accepted.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub tray: TrayId,
    pub verdict: TrayVerdict,
    pub action: OperatorAction,
}
