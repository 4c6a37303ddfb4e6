//! Canonical-resolution geometry and its derivation for other surfaces.
//!
//! Line breaking happens exactly once, with export-resolution widths and font
//! sizes. The preview never re-wraps: it multiplies every export quantity by
//! the fixed scale ratio. The preview legibility floor only changes the font
//! size text is *drawn* at, never where lines break.

use serde::{Deserialize, Serialize};

use crate::measure::{TextMeasurer, DEFAULT_FONT_FAMILY};
use crate::rendering::highlight::{HighlightBandCalculator, HighlightProportions};
use crate::rendering::layout::{layout, LayoutConfig, LayoutResult, PARAGRAPH_GAP_MULTIPLIER};
use crate::{Error, Result};

/// Pixel dimensions of a rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Final raster target.
pub const EXPORT_SIZE: Resolution = Resolution { width: 1080, height: 1440 };

/// On-screen preview.
pub const PREVIEW_SIZE: Resolution = Resolution { width: 360, height: 480 };

/// Configuration for the [`ResolutionAdapter`].
///
/// All lengths are export pixels. Defaults reproduce the cover composer's
/// reference constants.
///
/// # Examples
///
/// ```
/// let cfg = xhs_cover::AdapterConfig::default();
/// assert_eq!(cfg.export.width, 1080);
/// assert_eq!(cfg.highlight.pad_ratio, 0.15);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    pub export: Resolution,
    pub preview: Resolution,
    /// Editor font size → export pixels multiplier
    pub body_font_scale: f64,
    /// Allowed editor font size range
    pub body_font_min: f64,
    pub body_font_max: f64,
    /// Smallest export body font, in pixels
    pub export_font_floor: f64,
    /// Smallest body font drawn on the preview, in preview pixels
    pub preview_font_floor: f64,
    /// Left/right inset of the text column
    pub horizontal_padding: f64,
    pub line_height_ratio: f64,
    pub fallback_char_ratio: f64,
    pub font_family: String,
    pub highlight: HighlightProportions,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            export: EXPORT_SIZE,
            preview: PREVIEW_SIZE,
            body_font_scale: 3.5,
            body_font_min: 32.0,
            body_font_max: 80.0,
            export_font_floor: 40.0,
            preview_font_floor: 14.0,
            horizontal_padding: 90.0,
            line_height_ratio: 1.5,
            fallback_char_ratio: 0.6,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            highlight: HighlightProportions::default(),
        }
    }
}

/// Every pixel quantity a painter needs for one surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMetrics {
    /// Surface size relative to export (1.0 for export)
    pub scale: f64,
    pub width: u32,
    pub height: u32,
    /// Geometric body font size; drives band geometry
    pub font_px: f64,
    /// Body font size text is drawn at (after the legibility floor)
    pub display_font_px: f64,
    pub line_height: f64,
    pub paragraph_gap: f64,
    pub max_width: f64,
    pub padding_x: f64,
    pub highlight_pad: f64,
}

impl SurfaceMetrics {
    pub fn band_calculator(&self, proportions: HighlightProportions) -> HighlightBandCalculator {
        HighlightBandCalculator::new(self.font_px, self.scale, proportions)
    }

    /// Convert an export-pixel length to this surface.
    pub fn px(&self, export_px: f64) -> f64 {
        export_px * self.scale
    }
}

/// Single source of truth for wrapping; read-only derivation for the preview.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionAdapter {
    config: AdapterConfig,
}

impl ResolutionAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self> {
        let (e, p) = (config.export, config.preview);
        if e.width == 0 || e.height == 0 || p.width == 0 || p.height == 0 {
            return Err(Error::InvalidConfig("surface dimensions must be non-zero".into()));
        }
        // the preview must be a uniform scale of the export surface
        if u64::from(p.width) * u64::from(e.height) != u64::from(p.height) * u64::from(e.width) {
            return Err(Error::InvalidConfig(format!(
                "preview {}x{} is not a uniform scale of export {}x{}",
                p.width, p.height, e.width, e.height
            )));
        }
        let lengths = [
            ("body_font_min", config.body_font_min),
            ("body_font_max", config.body_font_max),
            ("body_font_scale", config.body_font_scale),
            ("export_font_floor", config.export_font_floor),
            ("preview_font_floor", config.preview_font_floor),
            ("horizontal_padding", config.horizontal_padding),
            ("line_height_ratio", config.line_height_ratio),
            ("fallback_char_ratio", config.fallback_char_ratio),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!("{} must be a finite non-negative number, got {}", name, value)));
            }
        }
        if config.horizontal_padding * 2.0 >= f64::from(e.width) {
            return Err(Error::InvalidConfig("horizontal padding leaves no text column".into()));
        }
        if config.body_font_min > config.body_font_max || config.body_font_scale <= 0.0 {
            return Err(Error::InvalidConfig("body font range is empty".into()));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Preview size divided by export size.
    pub fn scale_ratio(&self) -> f64 {
        f64::from(self.config.preview.width) / f64::from(self.config.export.width)
    }

    /// Clamp an editor font size to the configured range.
    pub fn clamp_body_font(&self, body_font_size: f64) -> f64 {
        let c = &self.config;
        if body_font_size.is_finite() {
            body_font_size.clamp(c.body_font_min, c.body_font_max)
        } else {
            c.body_font_min
        }
    }

    /// Export pixel size for an editor font size.
    pub fn export_font_px(&self, body_font_size: f64) -> f64 {
        let c = &self.config;
        (self.clamp_body_font(body_font_size) * c.body_font_scale)
            .round()
            .max(c.export_font_floor)
    }

    pub fn export_metrics(&self, body_font_size: f64) -> SurfaceMetrics {
        let c = &self.config;
        let font_px = self.export_font_px(body_font_size);
        let line_height = (font_px * c.line_height_ratio).round();
        SurfaceMetrics {
            scale: 1.0,
            width: c.export.width,
            height: c.export.height,
            font_px,
            display_font_px: font_px,
            line_height,
            paragraph_gap: (line_height * PARAGRAPH_GAP_MULTIPLIER).round(),
            max_width: f64::from(c.export.width) - 2.0 * c.horizontal_padding,
            padding_x: c.horizontal_padding,
            highlight_pad: c.highlight.pad_for(font_px, 1.0),
        }
    }

    /// Export metrics multiplied by the scale ratio. Only the displayed font
    /// size is floored.
    pub fn preview_metrics(&self, body_font_size: f64) -> SurfaceMetrics {
        let c = &self.config;
        let export = self.export_metrics(body_font_size);
        let r = self.scale_ratio();
        SurfaceMetrics {
            scale: r,
            width: c.preview.width,
            height: c.preview.height,
            font_px: export.font_px * r,
            display_font_px: (export.font_px * r).round().max(c.preview_font_floor),
            line_height: export.line_height * r,
            paragraph_gap: export.paragraph_gap * r,
            max_width: export.max_width * r,
            padding_x: export.padding_x * r,
            highlight_pad: export.highlight_pad * r,
        }
    }

    /// Layout input built from export metrics.
    pub fn layout_config(&self, text: &str, highlight_word: &str, body_font_size: f64) -> LayoutConfig {
        let m = self.export_metrics(body_font_size);
        LayoutConfig {
            text: text.to_string(),
            highlight_word: highlight_word.to_string(),
            max_width: m.max_width,
            font_pixel_size: m.font_px,
            font_family: self.config.font_family.clone(),
            highlight_pad: m.highlight_pad,
            fallback_char_ratio: self.config.fallback_char_ratio,
        }
    }

    /// The one wrapping pass shared by every surface.
    pub fn layout<M: TextMeasurer + ?Sized>(
        &self,
        text: &str,
        highlight_word: &str,
        body_font_size: f64,
        measurer: &M,
    ) -> Result<LayoutResult> {
        layout(&self.layout_config(text, highlight_word, body_font_size), measurer)
    }
}

impl Default for ResolutionAdapter {
    fn default() -> Self {
        Self { config: AdapterConfig::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scale_is_one_third() {
        let a = ResolutionAdapter::default();
        assert!((a.scale_ratio() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn export_font_is_clamped_scaled_and_floored() {
        let a = ResolutionAdapter::default();
        assert_eq!(a.export_font_px(52.0), 182.0);
        assert_eq!(a.export_font_px(10.0), 112.0);
        assert_eq!(a.export_font_px(500.0), 280.0);
        assert_eq!(a.export_font_px(f64::NAN), 112.0);

        let low = ResolutionAdapter::new(AdapterConfig { body_font_scale: 1.0, ..Default::default() }).unwrap();
        assert_eq!(low.export_font_px(32.0), 40.0);
    }

    #[test]
    fn export_metrics_reference_values() {
        let m = ResolutionAdapter::default().export_metrics(52.0);
        assert_eq!(m.max_width, 900.0);
        assert_eq!(m.line_height, 273.0);
        assert_eq!(m.paragraph_gap, 137.0);
        assert_eq!(m.highlight_pad, 27.0);
    }

    #[test]
    fn preview_floor_does_not_touch_geometry() {
        let cfg = AdapterConfig { body_font_scale: 1.0, export_font_floor: 32.0, ..Default::default() };
        let a = ResolutionAdapter::new(cfg).unwrap();
        let e = a.export_metrics(32.0);
        let p = a.preview_metrics(32.0);
        assert_eq!(e.font_px, 32.0);
        assert_eq!(p.display_font_px, 14.0);
        assert!((p.font_px - 32.0 / 3.0).abs() < 1e-9);
        assert!((p.max_width - e.max_width / 3.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_uniform_preview() {
        let cfg = AdapterConfig { preview: Resolution { width: 360, height: 500 }, ..Default::default() };
        assert!(matches!(ResolutionAdapter::new(cfg), Err(Error::InvalidConfig(_))));
        let cfg = AdapterConfig { horizontal_padding: 600.0, ..Default::default() };
        assert!(ResolutionAdapter::new(cfg).is_err());
    }

    #[test]
    fn rejects_non_finite_or_negative_lengths() {
        let bad = [
            AdapterConfig { body_font_min: f64::NAN, ..Default::default() },
            AdapterConfig { body_font_max: f64::NAN, ..Default::default() },
            AdapterConfig { body_font_scale: f64::INFINITY, ..Default::default() },
            AdapterConfig { export_font_floor: f64::NAN, ..Default::default() },
            AdapterConfig { preview_font_floor: f64::NEG_INFINITY, ..Default::default() },
            AdapterConfig { horizontal_padding: f64::NAN, ..Default::default() },
            AdapterConfig { horizontal_padding: -10.0, ..Default::default() },
        ];
        for cfg in bad {
            assert!(matches!(ResolutionAdapter::new(cfg), Err(Error::InvalidConfig(_))));
        }
        let ok = ResolutionAdapter::new(AdapterConfig::default()).unwrap();
        assert_eq!(ok.export_font_px(52.0), 182.0);
    }
}
