//! Coordinate projection.
//!
//! Maps genomic coordinates into pixel space for a given window and canvas
//! width. Projection is linear over the window's span; features are clipped
//! to the window before scaling, so a projected feature always lies inside
//! `[0, canvas_width]`.

use crate::model::{Feature, GenomeWindow, ProjectedFeature};

/// A feature record as returned by a genome-data provider.
///
/// Providers tag the coordinate space of what they return instead of leaving
/// the caller to guess it.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureRecord {
    /// Absolute genome coordinates; always projected locally.
    Genomic(Feature),
    /// Already scaled by the provider for a canvas of `canvas_width` pixels.
    Scaled {
        canvas_width: f64,
        feature: ProjectedFeature,
    },
}

impl From<Feature> for FeatureRecord {
    fn from(feature: Feature) -> Self {
        FeatureRecord::Genomic(feature)
    }
}

impl FeatureRecord {
    pub fn feature_type(&self) -> crate::model::FeatureType {
        match self {
            FeatureRecord::Genomic(f) => f.feature_type,
            FeatureRecord::Scaled { feature, .. } => feature.feature_type,
        }
    }
}

/// Projects a single genomic coordinate to an x position.
pub fn project_position(pos: u64, window: &GenomeWindow, canvas_width: f64) -> f64 {
    let span = window.span() as f64;
    (pos as f64 - window.start() as f64) / span * canvas_width
}

/// Projects a feature into the window.
///
/// Returns `None` when the feature does not overlap the window. Widths are
/// exact and may be sub-pixel; any minimum drawing width is the renderer's
/// business.
pub fn project(
    feature: &Feature,
    window: &GenomeWindow,
    canvas_width: f64,
) -> Option<ProjectedFeature> {
    if !feature.overlaps(window) {
        return None;
    }
    let visible_start = feature.start.max(window.start());
    let visible_end = feature.end.min(window.end()).max(visible_start);
    let span = window.span() as f64;

    let x = (visible_start - window.start()) as f64 / span * canvas_width;
    // Right edge from the same formula so it can never pass the canvas edge.
    let right = (visible_end - window.start()) as f64 / span * canvas_width;
    let width = right - x;

    Some(ProjectedFeature {
        feature_type: feature.feature_type,
        name: feature.name.clone(),
        strand: feature.strand,
        x,
        width,
        color: feature.color.clone(),
    })
}

/// Normalises a provider record into pixel space.
///
/// Genomic records are projected. Scaled records are accepted only if they
/// were produced for the same canvas width, and are then clipped to it.
pub fn project_record(
    record: &FeatureRecord,
    window: &GenomeWindow,
    canvas_width: f64,
) -> Option<ProjectedFeature> {
    match record {
        FeatureRecord::Genomic(feature) => project(feature, window, canvas_width),
        FeatureRecord::Scaled {
            canvas_width: scaled_for,
            feature,
        } => {
            if (scaled_for - canvas_width).abs() > f64::EPSILON {
                log::debug!(
                    "Dropping '{}': scaled for {}px, canvas is {}px",
                    feature.name,
                    scaled_for,
                    canvas_width
                );
                return None;
            }
            let left = feature.x.max(0.0);
            let right = (feature.x + feature.width).min(canvas_width);
            if right < left {
                return None;
            }
            Some(ProjectedFeature {
                x: left,
                width: right - left,
                ..feature.clone()
            })
        }
    }
}
