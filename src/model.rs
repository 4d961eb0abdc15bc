//! Data model for the genome browser.
//!
//! This module contains the value types shared by every layer:
//! - Annotated features and their types/strands
//! - The visible genomic window
//! - Projected (pixel-space) features and track slots
//! - Colours used by the drawing layer

use std::fmt;

/// Biological type of an annotated feature.
///
/// The declaration order is the track draw order; `Other` never gets a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureType {
    Gene,
    Mrna,
    Cds,
    Regulatory,
    Other,
}

impl FeatureType {
    /// Track kinds in draw order.
    pub const TRACKS: [FeatureType; 4] = [
        FeatureType::Gene,
        FeatureType::Mrna,
        FeatureType::Cds,
        FeatureType::Regulatory,
    ];

    /// Returns the display label (`gene`, `mRNA`, `CDS`, `regulatory`, `other`).
    pub fn label(&self) -> &'static str {
        match self {
            FeatureType::Gene => "gene",
            FeatureType::Mrna => "mRNA",
            FeatureType::Cds => "CDS",
            FeatureType::Regulatory => "regulatory",
            FeatureType::Other => "other",
        }
    }

    /// Parses a type label as emitted by a provider. Unknown labels map to `Other`.
    pub fn parse(label: &str) -> Self {
        match label {
            "gene" => FeatureType::Gene,
            "mRNA" => FeatureType::Mrna,
            "CDS" => FeatureType::Cds,
            "regulatory" => FeatureType::Regulatory,
            _ => FeatureType::Other,
        }
    }

    /// The catalog bucket this type is listed under.
    pub fn catalog_bucket(self) -> FeatureType {
        match self {
            FeatureType::Other => FeatureType::Regulatory,
            t => t,
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Feature strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    Unstranded,
}

impl Strand {
    /// Parses `+` / `-`; anything else is unstranded.
    pub fn parse(symbol: &str) -> Self {
        match symbol.trim() {
            "+" => Strand::Forward,
            "-" => Strand::Reverse,
            _ => Strand::Unstranded,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
            Strand::Unstranded => ".",
        }
    }

    /// Whether the strand has a direction worth drawing.
    pub fn is_directional(&self) -> bool {
        !matches!(self, Strand::Unstranded)
    }
}

/// An annotated genomic interval, in absolute genome coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub feature_type: FeatureType,
    pub name: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    /// Explicit CSS-style colour (`#rrggbb`), overriding the type palette.
    pub color: Option<String>,
}

impl Feature {
    /// Creates a feature without an explicit colour.
    pub fn new(
        feature_type: FeatureType,
        name: impl Into<String>,
        start: u64,
        end: u64,
        strand: Strand,
    ) -> Self {
        Self {
            feature_type,
            name: name.into(),
            start,
            end,
            strand,
            color: None,
        }
    }

    /// Sets an explicit colour.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Length in bases (`end - start`).
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the feature overlaps the given window (bounds inclusive).
    pub fn overlaps(&self, window: &GenomeWindow) -> bool {
        !(self.end < window.start() || self.start > window.end())
    }
}

/// The visible genomic range `[start, end)` of a genome of `genome_length` bases.
///
/// Always satisfies `end >= start + 1`, and `end <= genome_length` once a genome
/// is loaded. The only constructor is the clamping one, so a window that
/// violates these bounds cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenomeWindow {
    start: u64,
    end: u64,
    genome_length: u64,
}

impl GenomeWindow {
    /// Clamps a candidate range into a valid window.
    ///
    /// `start` is clamped to `>= 0` (and to leave room for one base), `end` to
    /// `<= genome_length`; if the result is shorter than one base, `end` becomes
    /// `start + 1`. With no genome loaded the result is the degenerate `[0, 1)`.
    pub(crate) fn clamped(start: i64, end: i64, genome_length: u64) -> Self {
        if genome_length == 0 {
            return Self {
                start: 0,
                end: 1,
                genome_length,
            };
        }
        let max_start = genome_length as i64 - 1;
        let start = start.clamp(0, max_start);
        let mut end = end.min(genome_length as i64);
        if end <= start + 1 {
            end = start + 1;
        }
        Self {
            start: start as u64,
            end: end as u64,
            genome_length,
        }
    }

    /// The full extent of a genome (`[0, genome_length)`).
    pub(crate) fn full(genome_length: u64) -> Self {
        Self::clamped(0, genome_length as i64, genome_length)
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn genome_length(&self) -> u64 {
        self.genome_length
    }

    /// Number of visible bases. Never zero.
    pub fn span(&self) -> u64 {
        self.end - self.start
    }

    /// Integer midpoint of the window.
    pub fn midpoint(&self) -> u64 {
        self.start + self.span() / 2
    }

    /// Human-readable description shown next to the tracks.
    pub fn label(&self) -> String {
        format!(
            "Window: {}-{} ({} bp of {})",
            self.start,
            self.end,
            self.span(),
            self.genome_length
        )
    }
}

/// A feature mapped into pixel space for one `(window, canvas width)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedFeature {
    pub feature_type: FeatureType,
    pub name: String,
    pub strand: Strand,
    pub x: f64,
    pub width: f64,
    pub color: Option<String>,
}

/// Vertical placement of one track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSlot {
    pub feature_type: FeatureType,
    pub y_center: f64,
    pub height: f64,
}

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rgb`, `#rrggbb`, `rgb(r,g,b)` and `rgba(r,g,b,alpha)` with a
    /// fractional alpha.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        let (inner, has_alpha) = if let Some(rest) = text.strip_prefix("rgba(") {
            (rest.strip_suffix(')')?, true)
        } else if let Some(rest) = text.strip_prefix("rgb(") {
            (rest.strip_suffix(')')?, false)
        } else {
            return None;
        };
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != if has_alpha { 4 } else { 3 } {
            return None;
        }
        let r = parts[0].parse().ok()?;
        let g = parts[1].parse().ok()?;
        let b = parts[2].parse().ok()?;
        let a = if has_alpha {
            let alpha: f64 = parts[3].parse().ok()?;
            (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
        } else {
            255
        };
        Some(Self { r, g, b, a })
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut it = hex.chars().map(|c| c.to_digit(16));
                let r = it.next()?? as u8;
                let g = it.next()?? as u8;
                let b = it.next()?? as u8;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => Some(Self::rgb(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            )),
            _ => None,
        }
    }

    /// Composites this colour over an opaque background.
    pub fn over(&self, background: Rgba) -> Rgba {
        let a = self.a as u32;
        let mix = |fg: u8, bg: u8| ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
        Rgba::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}
