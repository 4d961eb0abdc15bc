//! Track layout.
//!
//! Computes where each track sits vertically and how tall the canvas must be
//! to hold all tracks plus the ruler. Callers must resize the canvas to
//! [`TrackLayout::canvas_height`] before drawing, since resizing a surface
//! clears it.

use crate::config::LayoutConfig;
use crate::model::{CanvasSize, FeatureType, TrackSlot};

/// Result of a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackLayout {
    pub slots: Vec<TrackSlot>,
    pub canvas_height: f64,
    /// Y of the ruler's base line.
    pub ruler_y: f64,
}

impl TrackLayout {
    /// Canvas size for a given width under this layout.
    pub fn canvas(&self, width: f64) -> CanvasSize {
        CanvasSize::new(width, self.canvas_height)
    }
}

#[derive(Debug, Clone)]
pub struct TrackLayoutEngine {
    config: LayoutConfig,
    kinds: Vec<FeatureType>,
}

impl Default for TrackLayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl TrackLayoutEngine {
    /// Lays out the standard tracks in draw order.
    pub fn new(config: LayoutConfig) -> Self {
        Self::with_tracks(config, FeatureType::TRACKS.to_vec())
    }

    pub fn with_tracks(config: LayoutConfig, kinds: Vec<FeatureType>) -> Self {
        Self { config, kinds }
    }

    pub fn track_kinds(&self) -> &[FeatureType] {
        &self.kinds
    }

    /// Computes slot positions and the total canvas height.
    pub fn layout(&self) -> TrackLayout {
        let cfg = &self.config;
        let pitch = cfg.track_height + cfg.track_spacing;
        let slots = self
            .kinds
            .iter()
            .enumerate()
            .map(|(idx, &feature_type)| TrackSlot {
                feature_type,
                y_center: cfg.top_padding + idx as f64 * pitch,
                height: cfg.track_height,
            })
            .collect();
        let canvas_height = cfg.top_padding + self.kinds.len() as f64 * pitch + cfg.bottom_margin;
        TrackLayout {
            slots,
            canvas_height,
            ruler_y: canvas_height - cfg.bottom_margin / 2.0,
        }
    }
}
