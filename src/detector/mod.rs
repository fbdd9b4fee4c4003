//! Detector turning a preprocessed frame into scored findings.
//!
//! Overview
//! - Asks the external vision service for raw blob candidates per zone.
//! - Drops candidates whose extent crosses the frame edge margin.
//! - Scores the rest from size agreement, shape regularity and, for zones
//!   carrying a logo reference, template similarity.
//! - Marks oversized/irregular blobs as anomalies with confidence clamped
//!   below the borderline cutoff. An overlapping pair of parts must never
//!   read as two correct items.
//!
//! The companion [`focus`] module gates frames on a Laplacian-variance
//! sharpness measure before any of this runs.
//!
//! Modules
//! - [`params`] – option types with the design-default tunables.
//! - `pipeline` – the [`Detector`] implementation.
//! - `scoring` – confidence blend and anomaly screening.
//! - [`focus`] – frame sharpness measure.

pub mod focus;
pub mod params;

mod pipeline;
mod scoring;

pub use params::DetectorOptions;
pub use pipeline::Detector;
