//! Cover composition: document + layout → display list for one surface.
//!
//! Positions are computed in export pixels and multiplied by the surface
//! scale, so the preview is always a uniform reduction of the export. The body
//! is wrapped once (via [`ResolutionAdapter::layout`]) and that single
//! [`LayoutResult`] feeds both surfaces.

use crate::cover::{CoverDocument, NotebookPattern};
use crate::measure::{measure_or_estimate, FontSpec, TextMeasurer};
use crate::rendering::highlight::HighlightStyle;
use crate::rendering::layout::{LayoutItem, LayoutResult};
use crate::rendering::paint::{DisplayList, Fill, PaintCommand, Rect, Rgba, Shadow, Stroke, TextAlign};
use crate::rendering::resolution::{ResolutionAdapter, SurfaceMetrics};
use crate::Result;

// Fixed element placement, export pixels.
const TITLE_TOP: f64 = 180.0;
const TITLE_FONT_PX: f64 = 120.0;
const BODY_TOP: f64 = 420.0;
const TAG_FONT_PX: f64 = 48.0;
const TAG_PAD_X: f64 = 72.0;
const TAG_PAD_Y: f64 = 36.0;
const TAG_LEFT: f64 = 90.0;
const TAG_BOTTOM: f64 = 180.0;
const NOTEBOOK_STEP: f64 = 84.0;
const EMOJI_BASE_PX: f64 = 108.0;
const EMOJI_MIN_PX: f64 = 24.0;

/// Which surface a display list targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Export,
    Preview,
}

/// Both renderings of one document, sharing one layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedCover {
    pub layout: LayoutResult,
    pub export: DisplayList,
    pub preview: DisplayList,
}

pub struct CoverComposer<'a, M: TextMeasurer + ?Sized> {
    adapter: &'a ResolutionAdapter,
    measurer: &'a M,
}

impl<'a, M: TextMeasurer + ?Sized> CoverComposer<'a, M> {
    pub fn new(adapter: &'a ResolutionAdapter, measurer: &'a M) -> Self {
        Self { adapter, measurer }
    }

    /// Wrap the body once at export resolution.
    pub fn layout_body(&self, doc: &CoverDocument) -> Result<LayoutResult> {
        self.adapter.layout(
            &doc.text_content.body,
            &doc.text_content.highlight,
            doc.body_font_size,
            self.measurer,
        )
    }

    pub fn compose(&self, doc: &CoverDocument) -> Result<ComposedCover> {
        let layout = self.layout_body(doc)?;
        let export = self.paint(doc, &layout, Surface::Export);
        let preview = self.paint(doc, &layout, Surface::Preview);
        Ok(ComposedCover { layout, export, preview })
    }

    pub fn metrics(&self, doc: &CoverDocument, surface: Surface) -> SurfaceMetrics {
        match surface {
            Surface::Export => self.adapter.export_metrics(doc.body_font_size),
            Surface::Preview => self.adapter.preview_metrics(doc.body_font_size),
        }
    }

    /// Paint a previously computed layout onto `surface`.
    pub fn paint(&self, doc: &CoverDocument, layout: &LayoutResult, surface: Surface) -> DisplayList {
        let m = self.metrics(doc, surface);
        let mut list = DisplayList::new(m.width, m.height);
        let (w, h) = (f64::from(m.width), f64::from(m.height));

        list.push(PaintCommand::FillRect { rect: Rect::new(0.0, 0.0, w, h), fill: Fill::Solid(doc.background()) });
        self.paint_pattern(doc, &m, &mut list);
        self.paint_title(doc, &m, &mut list);
        self.paint_body(doc, layout, &m, &mut list);
        self.paint_tag(doc, &m, &mut list);
        self.paint_stickers(doc, &m, &mut list);
        list
    }

    fn paint_pattern(&self, doc: &CoverDocument, m: &SurfaceMetrics, list: &mut DisplayList) {
        let Some(template) = doc.selected_template.as_ref().filter(|t| t.is_notebook()) else {
            return;
        };
        let (line_w, vertical) = match template.pattern {
            Some(NotebookPattern::Lines) => (6.0, false),
            Some(NotebookPattern::Grid) => (3.0, true),
            _ => return,
        };
        let export = self.adapter.config().export;
        let (ew, eh) = (f64::from(export.width), f64::from(export.height));
        // rgba(0,0,0,0.06) under a 0.6 layer alpha
        let stroke = Stroke { color: Rgba::rgba(0, 0, 0, 0.06 * 0.6), width: m.px(line_w) };

        let mut y = 0.0;
        while y <= eh {
            list.push(PaintCommand::Line { from: (0.0, m.px(y)), to: (m.px(ew), m.px(y)), stroke });
            y += NOTEBOOK_STEP;
        }
        if vertical {
            let mut x = 0.0;
            while x <= ew {
                list.push(PaintCommand::Line { from: (m.px(x), 0.0), to: (m.px(x), m.px(eh)), stroke });
                x += NOTEBOOK_STEP;
            }
        }
    }

    fn paint_title(&self, doc: &CoverDocument, m: &SurfaceMetrics, list: &mut DisplayList) {
        let w = f64::from(m.width);
        let palette = doc.theme().palette();
        let (fill, shadow) = if doc.use_gradient_text {
            let pad = m.padding_x;
            let fill = Fill::gradient(
                (pad, m.px(TITLE_TOP)),
                (w - pad, m.px(TITLE_TOP)),
                &[
                    (0.0, Rgba::rgb(0xA8, 0x55, 0xF7)),
                    (0.25, Rgba::rgb(0x22, 0xD3, 0xEE)),
                    (0.5, Rgba::rgb(0xFD, 0xE0, 0x47)),
                    (0.75, Rgba::rgb(0xFF, 0x6B, 0x9C)),
                    (1.0, Rgba::rgb(0x4E, 0xCD, 0xC4)),
                ],
            );
            (fill, Shadow { color: Rgba::rgba(168, 85, 247, 0.4), blur: 20.0, offset_x: 0.0, offset_y: 0.0 })
        } else {
            (
                Fill::Solid(palette.primary),
                Shadow { color: Rgba::rgba(0, 0, 0, 0.1), blur: 4.0, offset_x: 2.0, offset_y: 2.0 },
            )
        };
        list.push(PaintCommand::Text {
            x: w / 2.0,
            y: m.px(TITLE_TOP),
            text: doc.text_content.title.clone(),
            font: FontSpec::new(m.px(TITLE_FONT_PX), self.adapter.config().font_family.clone()).bold(),
            fill,
            align: TextAlign::Center,
            shadow: Some(shadow.scaled(m.scale)),
        });
    }

    fn paint_body(&self, doc: &CoverDocument, layout: &LayoutResult, m: &SurfaceMetrics, list: &mut DisplayList) {
        let config = self.adapter.config();
        let export_width = f64::from(config.export.width);
        let primary = doc.theme().palette().primary;
        let style = HighlightStyle::from_gradient_flag(doc.use_gradient_text);
        let bands = m.band_calculator(config.highlight);
        let font = FontSpec::new(m.display_font_px, config.font_family.clone());

        // advance in export pixels; `m.px` maps to the surface
        let export = self.adapter.export_metrics(doc.body_font_size);
        let mut y = BODY_TOP;
        for item in &layout.items {
            let line = match item {
                LayoutItem::ParagraphGap { multiplier } => {
                    y += (export.line_height * multiplier).round();
                    continue;
                }
                LayoutItem::Line(line) => line,
            };
            let mut x = ((export_width - line.total_width) / 2.0).round();
            for token in &line.tokens {
                let (sx, sy) = (m.px(x), m.px(y));
                if token.token.is_highlight {
                    let text_width = m.px(token.text_width(layout.highlight_pad));
                    let band = bands.band(sx, sy, text_width);
                    let t = style.treatment(&band, m.scale);
                    let rect = Rect::new(band.x, band.y, band.width, band.height);
                    list.push(PaintCommand::FillRoundedRect {
                        rect,
                        radius: band.corner_radius,
                        fill: t.fill,
                        shadow: Some(t.shadow),
                    });
                    if let Some(accent) = t.bottom_accent {
                        let ay = band.y + band.height - accent.width / 2.0;
                        list.push(PaintCommand::Line {
                            from: (band.x + band.corner_radius, ay),
                            to: (band.x + band.width - band.corner_radius, ay),
                            stroke: accent,
                        });
                    }
                    list.push(PaintCommand::StrokeRoundedRect { rect, radius: band.corner_radius, stroke: t.rim });
                    list.push(PaintCommand::Text {
                        x: bands.text_x(&band),
                        y: sy,
                        text: token.token.text.clone(),
                        font: font.clone(),
                        fill: Fill::Solid(t.text_color),
                        align: TextAlign::Left,
                        shadow: Some(t.text_shadow),
                    });
                } else if !token.token.is_space {
                    list.push(PaintCommand::Text {
                        x: sx,
                        y: sy,
                        text: token.token.text.clone(),
                        font: font.clone(),
                        fill: Fill::Solid(primary),
                        align: TextAlign::Left,
                        shadow: None,
                    });
                }
                x += token.width;
            }
            y += export.line_height;
        }
    }

    fn paint_tag(&self, doc: &CoverDocument, m: &SurfaceMetrics, list: &mut DisplayList) {
        let config = self.adapter.config();
        let text = format!("#{}", doc.text_content.tag);
        // measured at export size so the pill scales uniformly
        let font = FontSpec::new(TAG_FONT_PX, config.font_family.clone());
        let text_w = measure_or_estimate(self.measurer, &text, &font, config.fallback_char_ratio);
        let tag_w = (text_w + TAG_PAD_X * 2.0).ceil();
        let tag_h = TAG_FONT_PX + TAG_PAD_Y * 2.0;
        let tag_x = TAG_LEFT;
        let tag_y = f64::from(config.export.height) - TAG_BOTTOM - tag_h;

        let palette = doc.theme().palette();
        let (c0, c1) = if doc.use_gradient_text {
            (Rgba::rgb(0x66, 0x7E, 0xEA), Rgba::rgb(0x76, 0x4B, 0xA2))
        } else {
            (palette.secondary, palette.accent)
        };
        let rect = Rect::new(m.px(tag_x), m.px(tag_y), m.px(tag_w), m.px(tag_h));
        list.push(PaintCommand::FillRoundedRect {
            rect,
            radius: m.px(tag_h / 2.0),
            fill: Fill::gradient(
                (rect.x, rect.y),
                (rect.x + rect.width, rect.y + rect.height),
                &[(0.0, c0), (1.0, c1)],
            ),
            shadow: Some(Shadow { color: Rgba::rgba(0, 0, 0, 0.2), blur: 25.0, offset_x: 0.0, offset_y: 0.0 }.scaled(m.scale)),
        });
        // gloss on the top third
        list.push(PaintCommand::FillRoundedRect {
            rect: Rect::new(rect.x, rect.y, rect.width, rect.height / 3.0),
            radius: m.px(tag_h / 2.0),
            fill: Fill::Solid(Rgba::rgba(255, 255, 255, 0.3)),
            shadow: None,
        });
        list.push(PaintCommand::Text {
            x: m.px(tag_x + (tag_w / 2.0).round()),
            y: m.px(tag_y + TAG_PAD_Y),
            text,
            font: FontSpec::new(m.px(TAG_FONT_PX), config.font_family.clone()),
            fill: Fill::Solid(Rgba::WHITE),
            align: TextAlign::Center,
            shadow: Some(Shadow { color: Rgba::rgba(0, 0, 0, 0.3), blur: 2.0, offset_x: 0.0, offset_y: 0.0 }.scaled(m.scale)),
        });
    }

    fn paint_stickers(&self, doc: &CoverDocument, m: &SurfaceMetrics, list: &mut DisplayList) {
        // sticker positions are stored in preview pixels
        let config = self.adapter.config();
        let to_export = f64::from(config.export.width) / f64::from(config.preview.width);
        for sticker in &doc.emojis {
            let size = EMOJI_MIN_PX.max((EMOJI_BASE_PX * sticker.scale).round());
            list.push(PaintCommand::Emoji {
                x: m.px(sticker.x * to_export),
                y: m.px(sticker.y * to_export),
                symbol: sticker.symbol.clone(),
                size: m.px(size),
                rotation_deg: sticker.rotation,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cover::Template;
    use crate::measure::FixedAdvanceMeasurer;

    fn doc() -> CoverDocument {
        let mut doc = CoverDocument::default();
        doc.text_content.body = "buy the best deal today".into();
        doc.text_content.highlight = "best".into();
        doc
    }

    #[test]
    fn export_body_is_centered_and_band_matches_token() {
        let adapter = ResolutionAdapter::default();
        let m = FixedAdvanceMeasurer::default();
        let composer = CoverComposer::new(&adapter, &m);
        let cover = composer.compose(&doc()).unwrap();
        let line = cover
            .layout
            .lines()
            .find(|l| l.tokens.iter().any(|t| t.token.is_highlight))
            .unwrap();

        let band = cover
            .export
            .commands
            .iter()
            .find_map(|c| match c {
                PaintCommand::FillRoundedRect { rect, shadow: Some(_), .. } if rect.y < 1000.0 => Some(*rect),
                _ => None,
            })
            .expect("highlight band");
        let best = line.tokens.iter().find(|t| t.token.is_highlight).unwrap();
        assert_eq!(band.width, best.width);
        // "best" opens the second line at 182px
        assert_eq!(line.tokens[0].token.text, "best");
        assert_eq!(band.x, ((1080.0 - line.total_width) / 2.0).round());
    }

    #[test]
    fn preview_is_uniform_reduction() {
        let adapter = ResolutionAdapter::default();
        let m = FixedAdvanceMeasurer::default();
        let cover = CoverComposer::new(&adapter, &m).compose(&doc()).unwrap();
        assert_eq!(cover.export.commands.len(), cover.preview.commands.len());
        assert_eq!((cover.preview.width, cover.preview.height), (360, 480));
        for (e, p) in cover.export.commands.iter().zip(&cover.preview.commands) {
            if let (PaintCommand::Text { x: ex, y: ey, .. }, PaintCommand::Text { x: px, y: py, .. }) = (e, p) {
                assert!((ex / 3.0 - px).abs() <= 1.0);
                assert!((ey / 3.0 - py).abs() <= 1.0);
            }
        }
    }

    #[test]
    fn notebook_grid_draws_both_directions() {
        let adapter = ResolutionAdapter::default();
        let m = FixedAdvanceMeasurer::default();
        let mut d = doc();
        d.select_template(Template::builtin().into_iter().find(|t| t.id == 9).unwrap());
        let list = CoverComposer::new(&adapter, &m).paint(&d, &LayoutResult {
            items: Vec::new(),
            max_width: 900.0,
            font_pixel_size: 182.0,
            highlight_pad: 27.0,
        }, Surface::Export);
        let lines = list.commands.iter().filter(|c| matches!(c, PaintCommand::Line { .. })).count();
        // 0..=1440 step 84 → 18 rows, 0..=1080 → 13 columns
        assert_eq!(lines, 18 + 13);
    }

    #[test]
    fn stickers_scale_from_preview_coordinates() {
        let adapter = ResolutionAdapter::default();
        let m = FixedAdvanceMeasurer::default();
        let mut d = doc();
        d.add_emoji("🔥", (360.0, 480.0));
        d.emojis[0].scale = 0.1;
        let cover = CoverComposer::new(&adapter, &m).compose(&d).unwrap();
        let emoji = cover.export.commands.iter().find_map(|c| match c {
            PaintCommand::Emoji { x, y, size, .. } => Some((*x, *y, *size)),
            _ => None,
        });
        assert_eq!(emoji, Some((540.0, 720.0, 24.0)));
    }
}
