//! xhs-cover
//!
//! Composes a social-media cover (1080×1440 export, 360×480 preview) from a
//! title, a body with one highlighted keyword, a hashtag pill and emoji
//! stickers, and rasterizes it to PNG.
//!
//! # Features
//!
//! - **Deterministic layout**: body text is wrapped once, at export
//!   resolution, from font metrics alone
//! - **Resolution lock-step**: the preview scales that single layout instead of
//!   re-wrapping, so both renderings always break lines identically
//! - **Highlight bands**: pill-shaped marker or rainbow bands with padding
//!   accounted for during wrapping
//! - **Raster** (default feature): software rasterizer with PNG output
//!
//! # Example
//!
//! ```
//! use xhs_cover::{FixedAdvanceMeasurer, LayoutConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LayoutConfig::new("buy the best deal today", "best", 500.0, 40.0);
//! let result = xhs_cover::layout(&config, &FixedAdvanceMeasurer::default())?;
//! assert!(result.lines().any(|l| l.tokens.iter().any(|t| t.token.is_highlight)));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod measure;
pub use measure::{FixedAdvanceMeasurer, FontSpec, HeuristicMeasurer, MemoMeasurer, TextMeasurer};

pub mod rendering;
pub use rendering::compose::{ComposedCover, CoverComposer, Surface};
pub use rendering::highlight::{HighlightBandCalculator, HighlightBandGeometry, HighlightProportions, HighlightStyle};
pub use rendering::layout::{layout, LayoutConfig, LayoutItem, LayoutResult, Line, MeasuredToken};
pub use rendering::resolution::{AdapterConfig, Resolution, ResolutionAdapter, SurfaceMetrics, EXPORT_SIZE, PREVIEW_SIZE};
pub use rendering::tokenize::{tokenize, Token};
pub use rendering::Screenshot;

// Editable document, persistence and sticker interaction
pub mod cover;
pub use cover::CoverDocument;

/// Compose `doc` and rasterize one surface to PNG.
///
/// Glyphs are drawn by `glyphs`; pass [`rendering::raster::NoopGlyphPainter`]
/// when no font backend is available.
#[cfg(feature = "raster")]
pub fn render_png<M: TextMeasurer + ?Sized>(
    doc: &CoverDocument,
    adapter: &ResolutionAdapter,
    measurer: &M,
    surface: Surface,
    glyphs: &dyn rendering::raster::GlyphPainter,
) -> Result<Screenshot> {
    let composer = CoverComposer::new(adapter, measurer);
    let layout = composer.layout_body(doc)?;
    let list = composer.paint(doc, &layout, surface);
    rendering::raster::rasterize(&list, glyphs)
}
