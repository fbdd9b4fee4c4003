//! Shared builders for profiles, findings, candidates and frames.

use tray_verifier::image::Frame;
use tray_verifier::profile::{ExpectedItem, LogoRef, TrayProfile};
use tray_verifier::services::RawCandidate;
use tray_verifier::types::{Finding, Region, TrayId, ZoneId};

pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Region {
    Region::Rect { x, y, w, h }
}

pub fn zone(name: &str, expected: u32, region: Region) -> ExpectedItem {
    ExpectedItem {
        zone: ZoneId::from(name),
        expected,
        region,
        logo: None,
    }
}

pub fn logo_zone(name: &str, expected: u32, region: Region, logo: &str) -> ExpectedItem {
    ExpectedItem {
        zone: ZoneId::from(name),
        expected,
        region,
        logo: Some(LogoRef(logo.to_string())),
    }
}

pub fn profile(id: &str, items: Vec<ExpectedItem>) -> TrayProfile {
    TrayProfile {
        id: TrayId::from(id),
        name: format!("{id} fixture"),
        version: 1,
        items,
    }
}

pub fn finding(x: f32, y: f32, confidence: f32) -> Finding {
    Finding {
        position: [x, y],
        radius_px: 5.0,
        confidence,
        logo_score: None,
        anomaly: false,
    }
}

pub fn anomalous_finding(x: f32, y: f32) -> Finding {
    Finding {
        position: [x, y],
        radius_px: 14.0,
        confidence: 0.45,
        logo_score: None,
        anomaly: true,
    }
}

pub fn candidate(x: f32, y: f32) -> RawCandidate {
    RawCandidate {
        center: [x, y],
        radius_px: 5.0,
        circularity: 0.9,
    }
}

/// Uniform mid-gray frame; measures zero on the focus gate.
pub fn flat_frame(w: usize, h: usize) -> Frame {
    Frame::new(w, h, vec![128u8; w * h])
}
