use xhs_cover::cover::{CoverDocument, Template};
use xhs_cover::rendering::paint::PaintCommand;
use xhs_cover::{AdapterConfig, CoverComposer, FixedAdvanceMeasurer, HeuristicMeasurer, HighlightProportions, ResolutionAdapter};

fn document(body: &str, highlight: &str, font: f64, gradient: bool) -> CoverDocument {
    let mut doc = CoverDocument::default();
    doc.text_content.body = body.into();
    doc.text_content.highlight = highlight.into();
    doc.body_font_size = font;
    doc.use_gradient_text = gradient;
    doc.add_emoji("🔥", (360.0, 480.0));
    doc.select_template(Template::builtin().into_iter().find(|t| t.id == 8).unwrap());
    doc
}

/// Every geometric number of a command, in a fixed order.
fn geometry(cmd: &PaintCommand) -> Vec<f64> {
    match cmd {
        PaintCommand::FillRect { rect, .. } => vec![rect.x, rect.y, rect.width, rect.height],
        PaintCommand::FillRoundedRect { rect, radius, .. } => vec![rect.x, rect.y, rect.width, rect.height, *radius],
        PaintCommand::StrokeRoundedRect { rect, radius, stroke } => {
            vec![rect.x, rect.y, rect.width, rect.height, *radius, stroke.width]
        }
        PaintCommand::Line { from, to, stroke } => vec![from.0, from.1, to.0, to.1, stroke.width],
        PaintCommand::Text { x, y, .. } => vec![*x, *y],
        PaintCommand::Emoji { x, y, size, .. } => vec![*x, *y, *size],
    }
}

fn assert_uniform_reduction(doc: &CoverDocument) {
    let adapter = ResolutionAdapter::default();
    let measurer = HeuristicMeasurer::default();
    let cover = CoverComposer::new(&adapter, &measurer).compose(doc).unwrap();
    let r = adapter.scale_ratio();

    assert_eq!(cover.export.commands.len(), cover.preview.commands.len());
    for (e, p) in cover.export.commands.iter().zip(&cover.preview.commands) {
        assert_eq!(std::mem::discriminant(e), std::mem::discriminant(p));
        for (ev, pv) in geometry(e).into_iter().zip(geometry(p)) {
            assert!((ev * r - pv).abs() <= 1.0, "export {} vs preview {} in {:?}", ev, pv, p);
        }
    }
    // same words, same order: identical line breaks on both surfaces
    assert_eq!(cover.export.texts().collect::<Vec<_>>(), cover.preview.texts().collect::<Vec<_>>());
}

#[test]
fn preview_matches_export_for_marker_style() {
    assert_uniform_reduction(&document("buy the best deal today and tomorrow too", "best", 52.0, false));
}

#[test]
fn preview_matches_export_for_gradient_style() {
    assert_uniform_reduction(&document(
        "在这里输入正文内容，包含高亮关键词的部分会自动高亮显示...\n第二段也有高亮关键词",
        "高亮关键词",
        80.0,
        true,
    ));
}

#[test]
fn preview_matches_export_at_smallest_font() {
    assert_uniform_reduction(&document("tiny words wrap a lot less than big ones do", "wrap", 32.0, false));
}

#[test]
fn preview_floor_changes_drawn_size_only() {
    let cfg = AdapterConfig { body_font_scale: 1.0, export_font_floor: 32.0, ..Default::default() };
    let adapter = ResolutionAdapter::new(cfg).unwrap();
    let m = FixedAdvanceMeasurer::default();
    let doc = document("small text stays wrapped the same way", "same", 32.0, false);
    let cover = CoverComposer::new(&adapter, &m).compose(&doc).unwrap();

    let body_fonts = |list: &xhs_cover::rendering::paint::DisplayList| -> Vec<f64> {
        list.commands
            .iter()
            .filter_map(|c| match c {
                PaintCommand::Text { font, text, .. } if !text.starts_with('#') && !font.bold => Some(font.pixel_size),
                _ => None,
            })
            .collect()
    };
    assert!(body_fonts(&cover.export).iter().all(|&px| px == 32.0));
    assert!(body_fonts(&cover.preview).iter().all(|&px| px == 14.0));
    assert_eq!(cover.export.texts().count(), cover.preview.texts().count());
}

#[test]
fn band_proportions_are_self_similar() {
    let adapter = ResolutionAdapter::default();
    let props = HighlightProportions::default();
    let e = adapter.export_metrics(60.0).band_calculator(props).band(0.0, 0.0, 300.0);
    let p = adapter.preview_metrics(60.0).band_calculator(props).band(0.0, 0.0, 100.0);
    let r = adapter.scale_ratio();
    assert!((e.width * r - p.width).abs() <= 1.0);
    assert!((e.height * r - p.height).abs() <= 1.0);
    assert!((e.corner_radius * r - p.corner_radius).abs() <= 1.0);
    assert_eq!(p.corner_radius, p.height / 2.0);
}
