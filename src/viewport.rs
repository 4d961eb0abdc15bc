//! Viewport controller.
//!
//! Owns the visible [`GenomeWindow`] and implements zoom, pan, goto and reset.
//! Every operation computes a candidate `(start, end)` and funnels it through
//! [`ViewportController::set_window`], which is the only place a window is
//! built.
//!
//! Note: `zoom_in` followed by `zoom_out` is not an involution. Halving floors
//! odd spans and the zoom floor widens small ones, so the round trip may end
//! one base short of an odd original span or wider than a small one.

use crate::config::ViewportConfig;
use crate::model::{Feature, GenomeWindow};

#[derive(Debug, Clone)]
pub struct ViewportController {
    window: GenomeWindow,
    config: ViewportConfig,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ViewportController {
    /// Creates a controller showing the whole genome, with default tuning.
    pub fn new(genome_length: u64) -> Self {
        Self::with_config(genome_length, ViewportConfig::default())
    }

    pub fn with_config(genome_length: u64, config: ViewportConfig) -> Self {
        Self {
            window: GenomeWindow::full(genome_length),
            config,
        }
    }

    /// The current window.
    pub fn window(&self) -> GenomeWindow {
        self.window
    }

    pub fn genome_length(&self) -> u64 {
        self.window.genome_length()
    }

    /// Display label for the current window.
    pub fn label(&self) -> String {
        self.window.label()
    }

    /// Clamps and installs a new window. Returns the installed window.
    pub fn set_window(&mut self, start: i64, end: i64) -> GenomeWindow {
        self.window = GenomeWindow::clamped(start, end, self.genome_length());
        log::debug!("{}", self.window.label());
        self.window
    }

    /// Halves the span (floored, never below the zoom floor) around the midpoint.
    pub fn zoom_in(&mut self) -> GenomeWindow {
        let span = self.window.span();
        let new_span = (span / 2).max(self.config.min_zoom_span);
        self.recenter(self.window.midpoint(), new_span)
    }

    /// Doubles the span (capped at the genome length) around the midpoint.
    pub fn zoom_out(&mut self) -> GenomeWindow {
        let span = self.window.span();
        let new_span = span.saturating_mul(2).min(self.genome_length());
        self.recenter(self.window.midpoint(), new_span)
    }

    /// Shifts the window left by a fraction of its span.
    ///
    /// At the start of the genome the span shrinks rather than wrapping.
    pub fn pan_left(&mut self) -> GenomeWindow {
        let shift = self.pan_shift();
        let (start, end) = self.bounds();
        self.set_window(start - shift, end - shift)
    }

    /// Shifts the window right by a fraction of its span.
    ///
    /// At the end of the genome the span shrinks rather than wrapping.
    pub fn pan_right(&mut self) -> GenomeWindow {
        let shift = self.pan_shift();
        let (start, end) = self.bounds();
        self.set_window(start + shift, end + shift)
    }

    /// Centers on `pos`, keeping the current span or widening it to the goto
    /// minimum. Never zooms in.
    pub fn goto_position(&mut self, pos: u64) -> GenomeWindow {
        let span = self.window.span().max(self.config.goto_min_span);
        let half = (span / 2) as i64;
        let pos = pos as i64;
        self.set_window(pos - half, pos + half)
    }

    /// Centers on a feature with half its length as flank on both sides, but
    /// at least the minimum pad.
    pub fn goto_feature(&mut self, feature: &Feature) -> GenomeWindow {
        let pad = (feature.len() / 2).max(self.config.min_feature_pad) as i64;
        self.set_window(feature.start as i64 - pad, feature.end as i64 + pad)
    }

    /// Shows the whole genome.
    pub fn reset(&mut self) -> GenomeWindow {
        self.set_window(0, self.genome_length() as i64)
    }

    fn recenter(&mut self, center: u64, span: u64) -> GenomeWindow {
        let start = center as i64 - (span / 2) as i64;
        self.set_window(start, start + span as i64)
    }

    fn pan_shift(&self) -> i64 {
        (self.window.span() as f64 * self.config.pan_fraction).floor() as i64
    }

    fn bounds(&self) -> (i64, i64) {
        (self.window.start() as i64, self.window.end() as i64)
    }
}
