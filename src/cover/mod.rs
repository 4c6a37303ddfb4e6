//! Editable cover document: text, theme, template and stickers.
//!
//! This is the flat state object the editor persists. Layout results are never
//! stored here; they are recomputed from these inputs.

pub mod sticker;
pub mod store;
pub mod theme;

pub use sticker::{InteractionSession, Point, StickerUpdate};
pub use store::{restore_document, save_document, DirStore, MemoryStore, StateStore, STATE_KEY};
pub use theme::{ColorTheme, Palette};

use serde::{Deserialize, Serialize};

use crate::rendering::paint::Rgba;

/// Default editor font size for body text.
pub const DEFAULT_BODY_FONT_SIZE: f64 = 52.0;

pub const DEFAULT_BACKGROUND: &str = "#F8F5F2";

/// Sticker scale limits applied by interactive scaling.
pub const MIN_STICKER_SCALE: f64 = 0.3;
pub const MAX_STICKER_SCALE: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    pub title: String,
    pub highlight: String,
    pub body: String,
    pub tag: String,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            title: "点击编辑主标题".to_string(),
            highlight: "高亮关键词".to_string(),
            body: "在这里输入正文内容，包含高亮关键词的部分会自动高亮显示...".to_string(),
            tag: "好物分享".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotebookPattern {
    Blank,
    Lines,
    Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: u64,
    pub name: String,
    pub theme: String,
    pub background_color: String,
    #[serde(default)]
    pub pattern: Option<NotebookPattern>,
}

impl Template {
    /// The notebook templates shipped with the editor.
    pub fn builtin() -> Vec<Template> {
        let notebook = |id, name: &str, pattern| Template {
            id,
            name: name.to_string(),
            theme: "notebook".to_string(),
            background_color: "#FDFDFD".to_string(),
            pattern: Some(pattern),
        };
        vec![
            notebook(7, "空白笔记本", NotebookPattern::Blank),
            notebook(8, "横线笔记本", NotebookPattern::Lines),
            notebook(9, "网格笔记本", NotebookPattern::Grid),
        ]
    }

    pub fn is_notebook(&self) -> bool {
        ColorTheme::from_name(&self.theme) == ColorTheme::Notebook
    }
}

/// An emoji sticker placed in preview coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    pub id: u64,
    pub symbol: String,
    pub x: f64,
    pub y: f64,
    #[serde(default = "one")]
    pub scale: f64,
    #[serde(default)]
    pub rotation: f64,
}

fn one() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoverDocument {
    pub selected_template: Option<Template>,
    pub text_content: TextContent,
    pub color_theme: String,
    pub background_color: String,
    pub emojis: Vec<Sticker>,
    pub body_font_size: f64,
    pub selected_emoji_id: Option<u64>,
    pub use_gradient_text: bool,
}

impl Default for CoverDocument {
    fn default() -> Self {
        Self {
            selected_template: None,
            text_content: TextContent::default(),
            color_theme: ColorTheme::Morandi.name().to_string(),
            background_color: DEFAULT_BACKGROUND.to_string(),
            emojis: Vec::new(),
            body_font_size: DEFAULT_BODY_FONT_SIZE,
            selected_emoji_id: None,
            use_gradient_text: false,
        }
    }
}

impl CoverDocument {
    pub fn theme(&self) -> ColorTheme {
        ColorTheme::from_name(&self.color_theme)
    }

    pub fn background(&self) -> Rgba {
        Rgba::from_hex(&self.background_color).unwrap_or(Rgba::WHITE)
    }

    /// Apply a template's theme and background; the user's text is kept.
    pub fn select_template(&mut self, template: Template) {
        self.color_theme = ColorTheme::from_name(&template.theme).name().to_string();
        self.background_color = template.background_color.clone();
        self.selected_template = Some(template);
    }

    /// Add a sticker at the preview centre and select it. Returns its id.
    pub fn add_emoji(&mut self, symbol: impl Into<String>, preview_size: (f64, f64)) -> u64 {
        let id = self.emojis.iter().map(|e| e.id).max().map_or(1, |m| m + 1);
        self.emojis.push(Sticker {
            id,
            symbol: symbol.into(),
            x: preview_size.0 / 2.0,
            y: preview_size.1 / 2.0,
            scale: 1.0,
            rotation: 0.0,
        });
        self.selected_emoji_id = Some(id);
        id
    }

    /// Merge an update into a sticker. Unknown ids are ignored.
    pub fn update_emoji(&mut self, id: u64, update: &StickerUpdate) -> bool {
        match self.emojis.iter_mut().find(|e| e.id == id) {
            Some(sticker) => {
                update.apply(sticker);
                true
            }
            None => false,
        }
    }

    pub fn delete_emoji(&mut self, id: u64) {
        self.emojis.retain(|e| e.id != id);
        if self.selected_emoji_id == Some(id) {
            self.selected_emoji_id = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_template_keeps_text() {
        let mut doc = CoverDocument::default();
        doc.text_content.body = "mine".into();
        let grid = Template::builtin().into_iter().find(|t| t.id == 9).unwrap();
        doc.select_template(grid);
        assert_eq!(doc.theme(), ColorTheme::Notebook);
        assert_eq!(doc.background_color, "#FDFDFD");
        assert_eq!(doc.text_content.body, "mine");
        assert!(doc.selected_template.as_ref().unwrap().is_notebook());
    }

    #[test]
    fn emoji_lifecycle() {
        let mut doc = CoverDocument::default();
        let a = doc.add_emoji("🔥", (360.0, 480.0));
        let b = doc.add_emoji("✨", (360.0, 480.0));
        assert_ne!(a, b);
        assert_eq!(doc.selected_emoji_id, Some(b));
        assert_eq!((doc.emojis[0].x, doc.emojis[0].y), (180.0, 240.0));

        let moved = doc.update_emoji(a, &StickerUpdate { rotation: Some(45.0), ..Default::default() });
        assert!(moved);
        assert_eq!(doc.emojis[0].rotation, 45.0);
        assert!(!doc.update_emoji(99, &StickerUpdate::default()));

        doc.delete_emoji(b);
        assert_eq!(doc.selected_emoji_id, None);
        assert_eq!(doc.emojis.len(), 1);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let doc: CoverDocument = serde_json::from_str(r#"{"colorTheme":"pink","emojis":[{"id":3,"symbol":"🌸","x":10,"y":20}]}"#).unwrap();
        assert_eq!(doc.theme(), ColorTheme::Pink);
        assert_eq!(doc.body_font_size, DEFAULT_BODY_FONT_SIZE);
        assert_eq!(doc.emojis[0].scale, 1.0);
        assert_eq!(doc.text_content, TextContent::default());
    }
}
