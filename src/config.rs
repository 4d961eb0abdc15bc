//! Configuration handling.
//!
//! Settings are read from a TOML file (`--config <path>`, or `genoview.toml`
//! in the working directory). Every key is optional; missing keys fall back
//! to the defaults below.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "genoview.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
}

/// Zoom, pan and goto tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewportConfig {
    /// Smallest span `zoom_in` will produce, in bases
    #[serde(default = "default_min_zoom_span")]
    pub min_zoom_span: u64,

    /// Smallest span used when jumping to a coordinate
    #[serde(default = "default_goto_min_span")]
    pub goto_min_span: u64,

    /// Smallest flank added on each side of a feature when centering on it
    #[serde(default = "default_min_feature_pad")]
    pub min_feature_pad: u64,

    /// Fraction of the span a pan step moves
    #[serde(default = "default_pan_fraction")]
    pub pan_fraction: f64,
}

/// Track geometry, in canvas pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_track_height")]
    pub track_height: f64,
    #[serde(default = "default_track_spacing")]
    pub track_spacing: f64,
    #[serde(default = "default_top_padding")]
    pub top_padding: f64,
    /// Space reserved below the last track for the ruler
    #[serde(default = "default_bottom_margin")]
    pub bottom_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderConfig {
    /// Features narrower than this get no name label
    #[serde(default = "default_label_min_width")]
    pub label_min_width: f64,
    #[serde(default = "default_chevron_spacing")]
    pub chevron_spacing: f64,
    #[serde(default = "default_chevron_size")]
    pub chevron_size: f64,
    /// Chevrons keep this distance from both ends of a feature body
    #[serde(default = "default_chevron_inset")]
    pub chevron_inset: f64,
    #[serde(default = "default_ruler_ticks")]
    pub ruler_ticks: u64,
    /// Narrowest body drawn for a visible feature
    #[serde(default = "default_min_feature_px")]
    pub min_feature_px: f64,
    /// Canvas pixels per terminal column
    #[serde(default = "default_px_per_cell")]
    pub px_per_cell: f64,
    /// Use unicode glyphs in panels
    #[serde(default)]
    pub fancy_glyphs: bool,
}

/// Fallback colours per track type, as CSS hex strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaletteConfig {
    #[serde(default = "default_gene_color")]
    pub gene: String,
    #[serde(default = "default_mrna_color")]
    pub mrna: String,
    #[serde(default = "default_cds_color")]
    pub cds: String,
    #[serde(default = "default_regulatory_color")]
    pub regulatory: String,
    #[serde(default = "default_other_color")]
    pub other: String,
    #[serde(default = "default_baseline_color")]
    pub baseline: String,
}

fn default_min_zoom_span() -> u64 { 1000 }
fn default_goto_min_span() -> u64 { 10_000 }
fn default_min_feature_pad() -> u64 { 1000 }
fn default_pan_fraction() -> f64 { 0.5 }

fn default_track_height() -> f64 { 40.0 }
fn default_track_spacing() -> f64 { 30.0 }
fn default_top_padding() -> f64 { 50.0 }
fn default_bottom_margin() -> f64 { 60.0 }

fn default_label_min_width() -> f64 { 60.0 }
fn default_chevron_spacing() -> f64 { 30.0 }
fn default_chevron_size() -> f64 { 6.0 }
fn default_chevron_inset() -> f64 { 12.0 }
fn default_ruler_ticks() -> u64 { 8 }
fn default_min_feature_px() -> f64 { 2.0 }
fn default_px_per_cell() -> f64 { 8.0 }

fn default_gene_color() -> String { "#2ecc71".to_string() }
fn default_mrna_color() -> String { "#f1c40f".to_string() }
fn default_cds_color() -> String { "#9b59b6".to_string() }
fn default_regulatory_color() -> String { "#e67e22".to_string() }
fn default_other_color() -> String { "#95a5a6".to_string() }
fn default_baseline_color() -> String { "#1976d2".to_string() }

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom_span: default_min_zoom_span(),
            goto_min_span: default_goto_min_span(),
            min_feature_pad: default_min_feature_pad(),
            pan_fraction: default_pan_fraction(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            track_height: default_track_height(),
            track_spacing: default_track_spacing(),
            top_padding: default_top_padding(),
            bottom_margin: default_bottom_margin(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            label_min_width: default_label_min_width(),
            chevron_spacing: default_chevron_spacing(),
            chevron_size: default_chevron_size(),
            chevron_inset: default_chevron_inset(),
            ruler_ticks: default_ruler_ticks(),
            min_feature_px: default_min_feature_px(),
            px_per_cell: default_px_per_cell(),
            fancy_glyphs: false,
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            gene: default_gene_color(),
            mrna: default_mrna_color(),
            cds: default_cds_color(),
            regulatory: default_regulatory_color(),
            other: default_other_color(),
            baseline: default_baseline_color(),
        }
    }
}

impl Config {
    /// Loads configuration from the given file, or from `genoview.toml` in the
    /// working directory, or falls back to defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)
                } else {
                    log::info!("Using default configuration");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Loads configuration from a specific TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.viewport.pan_fraction > 0.0 && self.viewport.pan_fraction <= 1.0) {
            anyhow::bail!(
                "viewport.pan_fraction must be in (0, 1] (got {})",
                self.viewport.pan_fraction
            );
        }
        if self.render.ruler_ticks == 0 {
            anyhow::bail!("render.ruler_ticks must be at least 1");
        }
        if self.render.chevron_spacing <= 0.0 {
            anyhow::bail!("render.chevron_spacing must be positive");
        }
        if self.render.px_per_cell <= 0.0 {
            anyhow::bail!("render.px_per_cell must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.viewport.min_zoom_span, 1000);
        assert_eq!(config.viewport.goto_min_span, 10_000);
        assert_eq!(config.layout.track_height, 40.0);
        assert_eq!(config.render.ruler_ticks, 8);
        assert_eq!(config.palette.gene, "#2ecc71");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml("[layout]\ntrack_height = 24.0\n").unwrap();
        assert_eq!(config.layout.track_height, 24.0);
        assert_eq!(config.layout.track_spacing, 30.0);
        assert_eq!(config.viewport, ViewportConfig::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Config::from_toml("[viewport]\npan_fraction = 0.0\n").is_err());
        assert!(Config::from_toml("[render]\nruler_ticks = 0\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genoview.toml");
        std::fs::write(&path, "[palette]\ngene = \"#000000\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.palette.gene, "#000000");
        assert_eq!(config.palette.cds, "#9b59b6");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
