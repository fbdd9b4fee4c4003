//! Candidate scoring: blends size agreement, shape regularity and optional
//! logo similarity into one confidence, and screens anomalies.
//!
//! Size agreement is judged against the scan-wide radius statistics rather
//! than an absolute calibration, so a tray of uniformly larger parts still
//! scores well while a single outsized blob among its peers does not.

use super::params::DetectorOptions;
use crate::services::RawCandidate;
use crate::types::{Finding, ScoreThresholds};

/// Radius/area statistics over one scan's surviving candidates.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BatchStats {
    pub mean_radius: f32,
    pub std_radius: f32,
    pub median_area: f32,
}

pub(crate) fn batch_stats(candidates: &[(usize, RawCandidate)]) -> BatchStats {
    if candidates.is_empty() {
        return BatchStats::default();
    }
    let n = candidates.len() as f32;
    let mean_radius = candidates.iter().map(|(_, c)| c.radius_px).sum::<f32>() / n;
    let var = candidates
        .iter()
        .map(|(_, c)| {
            let d = c.radius_px - mean_radius;
            d * d
        })
        .sum::<f32>()
        / n;
    let mut areas: Vec<f32> = candidates
        .iter()
        .map(|(_, c)| area_of(c.radius_px))
        .collect();
    areas.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let m = areas.len();
    let median_area = if m % 2 == 1 {
        areas[m / 2]
    } else {
        0.5 * (areas[m / 2 - 1] + areas[m / 2])
    };
    BatchStats {
        mean_radius,
        std_radius: var.sqrt(),
        median_area,
    }
}

#[inline]
fn area_of(radius_px: f32) -> f32 {
    std::f32::consts::PI * radius_px * radius_px
}

/// Score one candidate into a [`Finding`]. Anomalous blobs keep their raw
/// components but have the final confidence clamped strictly below the
/// borderline cutoff, so they can never count as correct items.
pub(crate) fn score_candidate(
    candidate: &RawCandidate,
    logo_score: Option<f32>,
    stats: &BatchStats,
    thresholds: &ScoreThresholds,
    options: &DetectorOptions,
) -> Finding {
    // Relative deviation drives the score; the sigma test below only screens
    // outliers. A tight batch must not turn sub-pixel jitter into penalties.
    let size_score = if stats.mean_radius > 0.0 {
        let rel = (candidate.radius_px - stats.mean_radius).abs() / stats.mean_radius;
        (1.0 - rel / options.size_tolerance).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let shape_score = candidate.circularity.clamp(0.0, 1.0);

    let mut weighted = options.size_weight * size_score + options.shape_weight * shape_score;
    let mut weight_sum = options.size_weight + options.shape_weight;
    if let Some(logo) = logo_score {
        weighted += options.logo_weight * logo.clamp(0.0, 1.0);
        weight_sum += options.logo_weight;
    }
    let mut confidence = if weight_sum > 0.0 {
        weighted / weight_sum
    } else {
        0.0
    };

    let oversized = stats.median_area > 0.0
        && area_of(candidate.radius_px) > options.oversized_area_factor * stats.median_area;
    let size_outlier = stats.std_radius > 0.0
        && (candidate.radius_px - stats.mean_radius).abs()
            > options.size_outlier_sigma * stats.std_radius;
    let irregular = candidate.circularity < options.min_circularity;
    let anomaly = oversized || size_outlier || irregular;

    if anomaly {
        let cap = (thresholds.borderline - options.anomaly_margin).max(0.0);
        confidence = confidence.min(cap);
    }

    Finding {
        position: candidate.center,
        radius_px: candidate.radius_px,
        confidence: confidence.clamp(0.0, 1.0),
        logo_score,
        anomaly,
    }
}
