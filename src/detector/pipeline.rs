//! Detection pipeline: per-zone candidate extraction, edge screening, batch
//! statistics and scoring.
//!
//! Stages
//! - Extract: ask the vision service for raw candidates inside each zone
//!   region, in profile order.
//! - Edge filter: drop candidates whose extent crosses the frame margin;
//!   partial blobs at the border must not be scored at all.
//! - Stats: radius mean/deviation and median area over the surviving batch.
//! - Score: blend size agreement, circularity and (for logo zones) template
//!   similarity; screen oversized/irregular blobs as anomalies.
//!
//! Given the same frame and profile the output is identical: zone order and
//! candidate order are preserved and all arithmetic is pure.

use super::params::DetectorOptions;
use super::scoring::{batch_stats, score_candidate};
use crate::error::RigError;
use crate::image::ImageU8;
use crate::profile::TrayProfile;
use crate::services::{RawCandidate, VisionService};
use crate::types::{Finding, ScoreThresholds};
use log::debug;
use rayon::prelude::*;

/// Turns a frame plus a tray profile into scored findings.
pub struct Detector<V> {
    vision: V,
    thresholds: ScoreThresholds,
    options: DetectorOptions,
}

impl<V: VisionService + Sync> Detector<V> {
    pub fn new(vision: V, thresholds: ScoreThresholds, options: DetectorOptions) -> Self {
        Self {
            vision,
            thresholds,
            options,
        }
    }

    /// Run the full pipeline. Fails with [`RigError::Acquisition`] when the
    /// vision service cannot process the frame; no findings are fabricated.
    pub fn detect(
        &self,
        image: ImageU8<'_>,
        profile: &TrayProfile,
    ) -> Result<Vec<Finding>, RigError> {
        let per_zone: Vec<Vec<RawCandidate>> = profile
            .items
            .par_iter()
            .map(|item| self.vision.extract_candidates(image.clone(), &item.region))
            .collect::<Result<_, _>>()?;

        let mut kept: Vec<(usize, RawCandidate)> = Vec::new();
        let mut excluded = 0usize;
        for (idx, candidates) in per_zone.into_iter().enumerate() {
            for c in candidates {
                if self.crosses_edge_margin(&c, image.w as f32, image.h as f32) {
                    debug!(
                        "Detector: candidate at ({:.1}, {:.1}) excluded by edge filter",
                        c.center[0], c.center[1]
                    );
                    excluded += 1;
                    continue;
                }
                kept.push((idx, c));
            }
        }

        let stats = batch_stats(&kept);

        let findings: Vec<Finding> = kept
            .par_iter()
            .map(|(idx, c)| {
                let logo_score = match &profile.items[*idx].logo {
                    Some(logo) => Some(self.vision.logo_similarity(image.clone(), c, logo)?),
                    None => None,
                };
                Ok(score_candidate(
                    c,
                    logo_score,
                    &stats,
                    &self.thresholds,
                    &self.options,
                ))
            })
            .collect::<Result<_, RigError>>()?;

        debug!(
            "Detector: {} finding(s), {} excluded at the edge, {} anomalous",
            findings.len(),
            excluded,
            findings.iter().filter(|f| f.anomaly).count()
        );
        Ok(findings)
    }

    fn crosses_edge_margin(&self, c: &RawCandidate, w: f32, h: f32) -> bool {
        let m = self.options.edge_margin_px;
        let r = c.radius_px;
        !(c.center[0] - r > m
            && c.center[0] + r < w - m
            && c.center[1] - r > m
            && c.center[1] + r < h - m)
    }
}
