//! Pure mapping from findings + profile to a tray verdict.
//!
//! A zone's status is a function of its findings and the expected count
//! alone; it is recomputed from scratch on every scan, never patched.
//! The per-zone rules apply in precedence order:
//!
//! 1. Any anomalous finding in the zone forces `Flagged`, whatever the count.
//! 2. Qualifying count equal to the expected count: `Confirmed`.
//! 3. Zero qualifying findings: `Missing`; absence is reported, never
//!    re-read as borderline presence, even if near-miss findings exist.
//! 4. Count within the borderline margin with at least one finding in the
//!    borderline band: `Borderline`.
//! 5. Anything else (surplus, or a deficit with no near-miss evidence):
//!    `Flagged`. A count that cannot be explained needs operator attention.

use super::types::{TrayVerdict, VerdictOptions, ZoneStatus, ZoneVerdict};
use crate::profile::TrayProfile;
use crate::types::{Finding, ScoreThresholds};
use log::debug;

/// Compute the verdict for one scan attempt.
pub fn map_verdict(
    findings: &[Finding],
    profile: &TrayProfile,
    thresholds: &ScoreThresholds,
    options: &VerdictOptions,
) -> TrayVerdict {
    let mut zones = Vec::with_capacity(profile.items.len());
    for item in &profile.items {
        let members: Vec<usize> = findings
            .iter()
            .enumerate()
            .filter(|(_, f)| item.region.contains(f.position))
            .map(|(i, _)| i)
            .collect();
        let status = zone_status(&members, findings, item.expected, thresholds, options);
        debug!(
            "Verdict: zone '{}' -> {:?} ({} finding(s), {} expected)",
            item.zone,
            status,
            members.len(),
            item.expected
        );
        zones.push(ZoneVerdict {
            zone: item.zone.clone(),
            status,
            findings: members,
        });
    }
    let status = zones
        .iter()
        .map(|z| z.status)
        .max()
        .unwrap_or(ZoneStatus::Confirmed);
    TrayVerdict {
        tray: profile.id.clone(),
        status,
        zones,
    }
}

fn zone_status(
    members: &[usize],
    findings: &[Finding],
    expected: u32,
    thresholds: &ScoreThresholds,
    options: &VerdictOptions,
) -> ZoneStatus {
    if members.iter().any(|&i| findings[i].anomaly) {
        return ZoneStatus::Flagged;
    }
    let qualifying = members
        .iter()
        .filter(|&&i| findings[i].confidence >= thresholds.confirm)
        .count() as u32;
    if qualifying == expected {
        return ZoneStatus::Confirmed;
    }
    if qualifying == 0 {
        return ZoneStatus::Missing;
    }
    let near_miss = members.iter().any(|&i| {
        let c = findings[i].confidence;
        c >= thresholds.borderline && c < thresholds.confirm
    });
    if qualifying.abs_diff(expected) <= options.borderline_margin && near_miss {
        return ZoneStatus::Borderline;
    }
    ZoneStatus::Flagged
}
