//! Highlight band geometry and the two selectable band styles.
//!
//! Geometry is a pure function of the surface's font size and the shared
//! [`HighlightProportions`]; the style only changes fills and strokes.

use serde::{Deserialize, Serialize};

use crate::rendering::paint::{Fill, Rgba, Shadow, Stroke};

/// Band proportions, as fractions of the font pixel size.
///
/// Minimums are expressed in export pixels and scale with the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightProportions {
    pub pad_ratio: f64,
    pub min_pad: f64,
    pub height_ratio: f64,
    pub offset_ratio: f64,
    pub border_ratio: f64,
    pub min_border: f64,
}

impl Default for HighlightProportions {
    fn default() -> Self {
        Self {
            pad_ratio: 0.15,
            min_pad: 24.0,
            height_ratio: 0.8,
            offset_ratio: 0.1,
            border_ratio: 0.06,
            min_border: 6.0,
        }
    }
}

impl HighlightProportions {
    /// Lateral padding on each side of a highlighted run.
    pub fn pad_for(&self, font_px: f64, scale: f64) -> f64 {
        (self.min_pad * scale).max((font_px * self.pad_ratio).round())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightBandGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub border_width: f64,
}

/// Computes band rectangles for one surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightBandCalculator {
    font_px: f64,
    scale: f64,
    proportions: HighlightProportions,
}

impl HighlightBandCalculator {
    /// `font_px` is the surface's geometric font size; `scale` is the surface
    /// size relative to the export surface (1.0 for export).
    pub fn new(font_px: f64, scale: f64, proportions: HighlightProportions) -> Self {
        Self { font_px, scale, proportions }
    }

    pub fn pad(&self) -> f64 {
        self.proportions.pad_for(self.font_px, self.scale)
    }

    /// Band behind a run of `text_width` pixels drawn at `(x, y)`, where `y` is
    /// the top of a top-aligned text line.
    pub fn band(&self, x: f64, y: f64, text_width: f64) -> HighlightBandGeometry {
        let p = &self.proportions;
        let height = (self.font_px * p.height_ratio).round();
        HighlightBandGeometry {
            x,
            // centres the band inside the 1em glyph box
            y: y + (self.font_px * p.offset_ratio).round(),
            width: text_width + 2.0 * self.pad(),
            height,
            corner_radius: height / 2.0,
            border_width: (p.min_border * self.scale).max((self.font_px * p.border_ratio).round()),
        }
    }

    /// Left edge of the highlighted text inside its band.
    pub fn text_x(&self, band: &HighlightBandGeometry) -> f64 {
        band.x + self.pad()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightStyle {
    /// Warm yellow marker, dark text, bottom accent stroke.
    #[default]
    Marker,
    /// Five-stop rainbow, white text, soft glow.
    Gradient,
}

impl HighlightStyle {
    pub fn from_gradient_flag(use_gradient: bool) -> Self {
        if use_gradient {
            HighlightStyle::Gradient
        } else {
            HighlightStyle::Marker
        }
    }

    /// Concrete fills and strokes for a band. Widths and blurs are in export
    /// pixels; `scale` converts them to the target surface.
    pub fn treatment(&self, band: &HighlightBandGeometry, scale: f64) -> BandTreatment {
        let from = (band.x, band.y);
        let to = (band.x + band.width, band.y);
        match self {
            HighlightStyle::Marker => BandTreatment {
                fill: Fill::gradient(
                    from,
                    to,
                    &[
                        (0.0, Rgba::rgba(255, 235, 59, 0.95)),
                        (0.5, Rgba::rgba(255, 245, 59, 0.8)),
                        (1.0, Rgba::rgba(255, 235, 59, 0.95)),
                    ],
                ),
                shadow: Shadow { color: Rgba::rgba(255, 193, 7, 0.4), blur: 9.0, offset_x: 0.0, offset_y: 3.0 }
                    .scaled(scale),
                rim: Stroke { color: Rgba::rgba(255, 255, 255, 0.6), width: 3.0 * scale },
                bottom_accent: Some(Stroke { color: Rgba::rgba(255, 193, 7, 0.7), width: band.border_width }),
                text_color: Rgba::from_hex("#1A202C").unwrap_or(Rgba::BLACK),
                text_shadow: Shadow { color: Rgba::rgba(255, 255, 255, 0.8), blur: 2.0, offset_x: 0.0, offset_y: 1.0 }
                    .scaled(scale),
            },
            HighlightStyle::Gradient => BandTreatment {
                fill: Fill::gradient(
                    from,
                    to,
                    &[
                        (0.0, Rgba::rgb(0xFF, 0x6B, 0x9C)),
                        (0.25, Rgba::rgb(0xFF, 0x8E, 0x53)),
                        (0.5, Rgba::rgb(0xFF, 0xD1, 0x66)),
                        (0.75, Rgba::rgb(0x4E, 0xCD, 0xC4)),
                        (1.0, Rgba::rgb(0xA7, 0x8B, 0xFA)),
                    ],
                ),
                shadow: Shadow { color: Rgba::rgba(255, 107, 156, 0.4), blur: 9.0, offset_x: 0.0, offset_y: 3.0 }
                    .scaled(scale),
                rim: Stroke { color: Rgba::rgba(255, 255, 255, 0.3), width: 3.0 * scale },
                bottom_accent: None,
                text_color: Rgba::WHITE,
                text_shadow: Shadow { color: Rgba::rgba(0, 0, 0, 0.3), blur: 4.0, offset_x: 0.0, offset_y: 2.0 }
                    .scaled(scale),
            },
        }
    }
}

/// Fill, stroke and text treatment of one band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandTreatment {
    pub fill: Fill,
    pub shadow: Shadow,
    pub rim: Stroke,
    pub bottom_accent: Option<Stroke>,
    pub text_color: Rgba,
    pub text_shadow: Shadow,
}
