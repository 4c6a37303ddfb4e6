//! Software rasterizer for display lists.
//!
//! Fills, rounded rectangles, strokes and lines are drawn here with
//! source-over blending at pixel centres. Glyphs are the host's business: text
//! and emoji commands are handed to a [`GlyphPainter`]. Shadows are not drawn.

use std::io::Cursor;

use image::{ImageFormat, Rgba as Pixel, RgbaImage};

use crate::rendering::paint::{DisplayList, Fill, PaintCommand, Rect, Rgba};
use crate::rendering::Screenshot;
use crate::Result;

/// Draws text and emoji commands onto the canvas.
pub trait GlyphPainter {
    fn paint_glyphs(&self, canvas: &mut RgbaImage, command: &PaintCommand);
}

/// Leaves glyphs out; backgrounds, bands and pills are still drawn.
pub struct NoopGlyphPainter;

impl GlyphPainter for NoopGlyphPainter {
    fn paint_glyphs(&self, _canvas: &mut RgbaImage, command: &PaintCommand) {
        if let PaintCommand::Text { text, .. } = command {
            log::trace!("skipping glyphs for {:?}", text);
        }
    }
}

/// Rasterize a display list to RGBA pixels.
pub fn rasterize_image(list: &DisplayList, glyphs: &dyn GlyphPainter) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(list.width, list.height, Pixel([0, 0, 0, 0]));
    for cmd in &list.commands {
        match cmd {
            PaintCommand::FillRect { rect, fill } => fill_rounded(&mut canvas, rect, 0.0, fill),
            PaintCommand::FillRoundedRect { rect, radius, fill, .. } => fill_rounded(&mut canvas, rect, *radius, fill),
            PaintCommand::StrokeRoundedRect { rect, radius, stroke } => {
                let half = stroke.width / 2.0;
                let outer = Rect::new(rect.x - half, rect.y - half, rect.width + stroke.width, rect.height + stroke.width);
                let inner = Rect::new(rect.x + half, rect.y + half, rect.width - stroke.width, rect.height - stroke.width);
                let (ro, ri) = (radius + half, (radius - half).max(0.0));
                for_each_pixel(&mut canvas, &outer, |px, py| {
                    inside_rounded(&outer, ro, px, py) && !inside_rounded(&inner, ri, px, py)
                }, |_, _| stroke.color);
            }
            PaintCommand::Line { from, to, stroke } => {
                let half = stroke.width / 2.0;
                let bounds = Rect::new(
                    from.0.min(to.0) - half,
                    from.1.min(to.1) - half,
                    (from.0 - to.0).abs() + stroke.width,
                    (from.1 - to.1).abs() + stroke.width,
                );
                for_each_pixel(&mut canvas, &bounds, |px, py| segment_distance(*from, *to, px, py) <= half, |_, _| stroke.color);
            }
            PaintCommand::Text { .. } | PaintCommand::Emoji { .. } => glyphs.paint_glyphs(&mut canvas, cmd),
        }
    }
    canvas
}

/// Rasterize and PNG-encode a display list.
pub fn rasterize(list: &DisplayList, glyphs: &dyn GlyphPainter) -> Result<Screenshot> {
    let canvas = rasterize_image(list, glyphs);
    let mut png_data = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut png_data), ImageFormat::Png)?;
    log::debug!("rasterized {} commands into {} PNG bytes", list.commands.len(), png_data.len());
    Ok(Screenshot { width: list.width, height: list.height, png_data })
}

fn fill_rounded(canvas: &mut RgbaImage, rect: &Rect, radius: f64, fill: &Fill) {
    for_each_pixel(canvas, rect, |px, py| inside_rounded(rect, radius, px, py), |px, py| fill.color_at(px, py));
}

fn for_each_pixel(
    canvas: &mut RgbaImage,
    bounds: &Rect,
    inside: impl Fn(f64, f64) -> bool,
    color: impl Fn(f64, f64) -> Rgba,
) {
    let (w, h) = (canvas.width() as f64, canvas.height() as f64);
    let x0 = bounds.x.max(0.0).floor() as u32;
    let y0 = bounds.y.max(0.0).floor() as u32;
    let x1 = (bounds.x + bounds.width).min(w).ceil().max(0.0) as u32;
    let y1 = (bounds.y + bounds.height).min(h).ceil().max(0.0) as u32;
    for y in y0..y1 {
        for x in x0..x1 {
            let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
            if inside(px, py) {
                blend(canvas.get_pixel_mut(x, y), color(px, py));
            }
        }
    }
}

/// Point-in-rounded-rect test; the radius is clamped to half the shorter side.
fn inside_rounded(rect: &Rect, radius: f64, px: f64, py: f64) -> bool {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return false;
    }
    if px < rect.x || py < rect.y || px > rect.x + rect.width || py > rect.y + rect.height {
        return false;
    }
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    // with r at half a side, rounding can leave the far edge one ulp short
    let (lo_x, lo_y) = (rect.x + r, rect.y + r);
    let cx = px.clamp(lo_x, (rect.x + rect.width - r).max(lo_x));
    let cy = py.clamp(lo_y, (rect.y + rect.height - r).max(lo_y));
    (px - cx).powi(2) + (py - cy).powi(2) <= r * r
}

fn segment_distance(a: (f64, f64), b: (f64, f64), px: f64, py: f64) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 { 0.0 } else { (((px - a.0) * dx + (py - a.1) * dy) / len2).clamp(0.0, 1.0) };
    (px - (a.0 + t * dx)).hypot(py - (a.1 + t * dy))
}

fn blend(dst: &mut Pixel<u8>, src: Rgba) {
    let sa = src.a as f64 / 255.0;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let mix = |s: u8, d: u8| {
        let c = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    *dst = Pixel([
        mix(src.r, dst[0]),
        mix(src.g, dst[1]),
        mix(src.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ]);
}
