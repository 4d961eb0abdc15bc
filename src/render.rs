//! Track rendering.
//!
//! The renderer draws onto any [`DrawSurface`]: a minimal fill-only 2D
//! capability. [`RecordingSurface`] captures the primitives so a frame can be
//! inspected in tests or replayed onto a terminal canvas by the UI.
//!
//! A frame is a pure function of `(window, canvas, records)`: rendering twice
//! with the same inputs records the same operations.

use crate::config::{LayoutConfig, PaletteConfig, RenderConfig};
use crate::layout::TrackLayoutEngine;
use crate::model::{
    CanvasSize, FeatureType, GenomeWindow, ProjectedFeature, Rgba, Strand, TrackSlot,
};
use crate::projection::{project_position, project_record, FeatureRecord};

/// Axis-aligned rectangle in canvas pixels (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PxRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PxRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_px: f64,
    pub color: Rgba,
}

/// Minimal drawing capability needed by [`TrackRenderer`].
pub trait DrawSurface {
    fn clear_rect(&mut self, rect: PxRect);
    fn fill_rect(&mut self, rect: PxRect, color: Rgba);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle);
    /// Fills the closed polygon through `points`.
    fn fill_path(&mut self, points: &[(f64, f64)], color: Rgba);
}

/// One recorded drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(PxRect),
    FillRect { rect: PxRect, color: Rgba },
    FillText { text: String, x: f64, y: f64, style: TextStyle },
    FillPath { points: Vec<(f64, f64)>, color: Rgba },
}

/// A surface that records every primitive drawn on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// All text drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear_rect(&mut self, rect: PxRect) {
        // A full clear discards everything drawn before it.
        self.ops.clear();
        self.ops.push(DrawOp::Clear(rect));
    }

    fn fill_rect(&mut self, rect: PxRect, color: Rgba) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }

    fn fill_path(&mut self, points: &[(f64, f64)], color: Rgba) {
        self.ops.push(DrawOp::FillPath {
            points: points.to_vec(),
            color,
        });
    }
}

/// Fallback colours keyed by feature type.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub gene: Rgba,
    pub mrna: Rgba,
    pub cds: Rgba,
    pub regulatory: Rgba,
    pub other: Rgba,
    pub baseline: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&PaletteConfig::default())
    }
}

impl Palette {
    /// Builds a palette, keeping the built-in colour for any unparsable entry.
    pub fn from_config(config: &PaletteConfig) -> Self {
        let pick = |value: &str, fallback: Rgba, key: &str| {
            Rgba::parse(value).unwrap_or_else(|| {
                log::warn!("Invalid palette.{} colour '{}', using default", key, value);
                fallback
            })
        };
        Self {
            gene: pick(&config.gene, Rgba::rgb(0x2e, 0xcc, 0x71), "gene"),
            mrna: pick(&config.mrna, Rgba::rgb(0xf1, 0xc4, 0x0f), "mrna"),
            cds: pick(&config.cds, Rgba::rgb(0x9b, 0x59, 0xb6), "cds"),
            regulatory: pick(&config.regulatory, Rgba::rgb(0xe6, 0x7e, 0x22), "regulatory"),
            other: pick(&config.other, Rgba::rgb(0x95, 0xa5, 0xa6), "other"),
            baseline: pick(&config.baseline, Rgba::rgb(0x19, 0x76, 0xd2), "baseline"),
        }
    }

    pub fn for_type(&self, feature_type: FeatureType) -> Rgba {
        match feature_type {
            FeatureType::Gene => self.gene,
            FeatureType::Mrna => self.mrna,
            FeatureType::Cds => self.cds,
            FeatureType::Regulatory => self.regulatory,
            FeatureType::Other => self.other,
        }
    }
}

const LABEL_COLOR: Rgba = Rgba::BLACK;
const TRACK_LABEL_COLOR: Rgba = Rgba::rgb(0x44, 0x44, 0x44);
const RULER_COLOR: Rgba = Rgba::rgb(0x33, 0x33, 0x33);
const CHEVRON_COLOR: Rgba = Rgba::rgba(0, 0, 0, 89);

const FEATURE_LABEL_PX: f64 = 11.0;
const TRACK_LABEL_PX: f64 = 12.0;
const RULER_LABEL_PX: f64 = 10.0;
const BASELINE_THICKNESS: f64 = 2.0;
const RULER_TICK_LENGTH: f64 = 8.0;
/// Chevron rows sit this far above and below the track center.
const CHEVRON_ROW_OFFSET: f64 = 15.0;

/// What a render pass drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub features_drawn: usize,
    pub ruler_ticks: usize,
}

/// Draws tracks, features, strand chevrons and the coordinate ruler.
#[derive(Debug, Clone)]
pub struct TrackRenderer {
    layout: TrackLayoutEngine,
    config: RenderConfig,
    palette: Palette,
}

impl Default for TrackRenderer {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), RenderConfig::default(), Palette::default())
    }
}

impl TrackRenderer {
    pub fn new(layout: LayoutConfig, config: RenderConfig, palette: Palette) -> Self {
        Self {
            layout: TrackLayoutEngine::new(layout),
            config,
            palette,
        }
    }

    pub fn layout_engine(&self) -> &TrackLayoutEngine {
        &self.layout
    }

    /// Draws one frame.
    ///
    /// Records are drawn in input order within each track. The surface is the
    /// only thing mutated.
    pub fn render(
        &self,
        surface: &mut dyn DrawSurface,
        window: &GenomeWindow,
        canvas: CanvasSize,
        records: &[FeatureRecord],
    ) -> RenderStats {
        let mut stats = RenderStats::default();
        surface.clear_rect(PxRect::new(0.0, 0.0, canvas.width, canvas.height));

        let layout = self.layout.layout();
        for slot in &layout.slots {
            stats.features_drawn += self.draw_track(surface, slot, window, canvas, records);
        }

        stats.ruler_ticks = self.draw_ruler(surface, window, canvas, layout.ruler_y);
        stats
    }

    fn draw_track(
        &self,
        surface: &mut dyn DrawSurface,
        slot: &TrackSlot,
        window: &GenomeWindow,
        canvas: CanvasSize,
        records: &[FeatureRecord],
    ) -> usize {
        let top = slot.y_center - slot.height / 2.0;
        surface.fill_rect(
            PxRect::new(0.0, slot.y_center - BASELINE_THICKNESS, canvas.width, BASELINE_THICKNESS),
            self.palette.baseline,
        );

        let mut drawn = 0;
        for record in records.iter().filter(|r| r.feature_type() == slot.feature_type) {
            let Some(projected) = project_record(record, window, canvas.width) else {
                continue;
            };
            self.draw_feature(surface, slot, top, &projected);
            drawn += 1;
        }

        surface.fill_text(
            &slot.feature_type.label().to_uppercase(),
            6.0,
            top - 10.0,
            TextStyle {
                size_px: TRACK_LABEL_PX,
                color: TRACK_LABEL_COLOR,
            },
        );
        drawn
    }

    fn draw_feature(
        &self,
        surface: &mut dyn DrawSurface,
        slot: &TrackSlot,
        top: f64,
        feature: &ProjectedFeature,
    ) {
        let width = feature.width.max(self.config.min_feature_px);
        let color = feature
            .color
            .as_deref()
            .and_then(Rgba::parse)
            .unwrap_or_else(|| self.palette.for_type(slot.feature_type));
        surface.fill_rect(PxRect::new(feature.x, top, width, slot.height), color);

        if width > self.config.label_min_width {
            surface.fill_text(
                &feature.name,
                feature.x + 4.0,
                top - 4.0,
                TextStyle {
                    size_px: FEATURE_LABEL_PX,
                    color: LABEL_COLOR,
                },
            );
        }

        if feature.strand.is_directional() {
            self.draw_chevrons(surface, feature.x, width, slot.y_center, feature.strand);
        }
    }

    /// Two rows of chevrons along the body, pointing along the strand and kept
    /// `chevron_inset` away from both ends.
    fn draw_chevrons(
        &self,
        surface: &mut dyn DrawSurface,
        x: f64,
        width: f64,
        y_center: f64,
        strand: Strand,
    ) {
        let size = self.config.chevron_size;
        let inset = self.config.chevron_inset;
        let y_top = y_center - CHEVRON_ROW_OFFSET;
        let y_bottom = y_center + CHEVRON_ROW_OFFSET;
        // Forward chevrons open to the left of their tip, reverse to the right.
        let back = match strand {
            Strand::Forward => -size,
            Strand::Reverse => size,
            Strand::Unstranded => return,
        };

        let mut ax = x + inset;
        while ax < x + width - inset {
            surface.fill_path(
                &[(ax + back, y_top), (ax, y_top + size), (ax + back, y_top + 2.0 * size)],
                CHEVRON_COLOR,
            );
            surface.fill_path(
                &[
                    (ax + back, y_bottom - 2.0 * size),
                    (ax, y_bottom - size),
                    (ax + back, y_bottom),
                ],
                CHEVRON_COLOR,
            );
            ax += self.config.chevron_spacing;
        }
    }

    fn draw_ruler(
        &self,
        surface: &mut dyn DrawSurface,
        window: &GenomeWindow,
        canvas: CanvasSize,
        base_y: f64,
    ) -> usize {
        surface.fill_rect(PxRect::new(0.0, base_y, canvas.width, 1.0), RULER_COLOR);

        let step = (window.span() / self.config.ruler_ticks.max(1)).max(1);
        let style = TextStyle {
            size_px: RULER_LABEL_PX,
            color: RULER_COLOR,
        };
        let mut ticks = 0;
        let mut pos = window.start();
        while pos <= window.end() {
            let x = project_position(pos, window, canvas.width);
            surface.fill_rect(PxRect::new(x, base_y, 1.0, RULER_TICK_LENGTH), RULER_COLOR);
            surface.fill_text(&pos.to_string(), x + 2.0, base_y + 18.0, style);
            ticks += 1;
            pos += step;
        }
        ticks
    }
}
