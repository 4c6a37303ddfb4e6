//! Greedy line breaking over highlight-aware tokens.
//!
//! Layout runs once, at the canonical (export) resolution. Every other
//! surface reads the resulting [`LayoutResult`] and scales it; nothing
//! downstream re-wraps text.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::measure::{measure_or_estimate, FontSpec, MemoMeasurer, TextMeasurer, DEFAULT_FONT_FAMILY};
use crate::rendering::highlight::HighlightProportions;
use crate::rendering::tokenize::{tokenize, Token};
use crate::{Error, Result};

/// Vertical spacing between paragraphs, as a fraction of the line height.
pub const PARAGRAPH_GAP_MULTIPLIER: f64 = 0.5;

/// Input of a single layout call. Built fresh per call; never shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub text: String,
    pub highlight_word: String,
    pub max_width: f64,
    pub font_pixel_size: f64,
    pub font_family: String,
    /// Lateral padding added on each side of a highlighted run.
    pub highlight_pad: f64,
    /// Width estimate, in em, for characters the measurer cannot handle.
    pub fallback_char_ratio: f64,
}

impl LayoutConfig {
    /// Config with the default highlight proportions and font stack.
    pub fn new(
        text: impl Into<String>,
        highlight_word: impl Into<String>,
        max_width: f64,
        font_pixel_size: f64,
    ) -> Self {
        Self {
            text: text.into(),
            highlight_word: highlight_word.into(),
            max_width,
            font_pixel_size,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            highlight_pad: HighlightProportions::default().pad_for(font_pixel_size, 1.0),
            fallback_char_ratio: 0.6,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.max_width.is_finite() || self.max_width <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max width must be positive, got {}",
                self.max_width
            )));
        }
        if !self.font_pixel_size.is_finite() || self.font_pixel_size <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "font pixel size must be positive, got {}",
                self.font_pixel_size
            )));
        }
        if !self.highlight_pad.is_finite() || self.highlight_pad < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "highlight padding must be non-negative, got {}",
                self.highlight_pad
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredToken {
    #[serde(flatten)]
    pub token: Token,
    /// Render width, including both highlight pads when highlighted.
    pub width: f64,
}

impl MeasuredToken {
    /// Width of the glyphs alone, without highlight padding.
    pub fn text_width(&self, highlight_pad: f64) -> f64 {
        if self.token.is_highlight {
            (self.width - 2.0 * highlight_pad).max(0.0)
        } else {
            self.width
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub tokens: Vec<MeasuredToken>,
    pub total_width: f64,
}

impl Line {
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.token.text.as_str()).collect()
    }

    /// A line allowed to exceed the max width: one token of one character.
    pub fn is_irreducible(&self) -> bool {
        self.tokens.len() == 1 && self.tokens[0].token.text.chars().count() == 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutItem {
    Line(Line),
    ParagraphGap { multiplier: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub items: Vec<LayoutItem>,
    pub max_width: f64,
    pub font_pixel_size: f64,
    pub highlight_pad: f64,
}

impl LayoutResult {
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.items.iter().filter_map(|item| match item {
            LayoutItem::Line(line) => Some(line),
            LayoutItem::ParagraphGap { .. } => None,
        })
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Token groupings per line, the observable wrapping decision.
    pub fn line_breaks(&self) -> Vec<Vec<String>> {
        self.lines()
            .map(|l| l.tokens.iter().map(|t| t.token.text.clone()).collect())
            .collect()
    }

    /// SHA-256 over the serialized result; equal layouts give equal digests.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

/// Measures tokens in one font, adding highlight padding where needed.
struct TokenMetrics<'a, M: TextMeasurer + ?Sized> {
    measurer: MemoMeasurer<'a, M>,
    font: FontSpec,
    highlight_pad: f64,
    fallback_char_ratio: f64,
    max_width: f64,
}

impl<M: TextMeasurer + ?Sized> TokenMetrics<'_, M> {
    fn width(&self, text: &str, highlight: bool) -> f64 {
        let w = measure_or_estimate(&self.measurer, text, &self.font, self.fallback_char_ratio);
        if highlight {
            w + 2.0 * self.highlight_pad
        } else {
            w
        }
    }

    /// Break a token too wide for a line into character runs that fit.
    ///
    /// A single character wider than the line is emitted alone.
    fn split_token(&self, token: Token) -> Vec<Token> {
        if token.is_space || token.text.trim().is_empty() {
            return vec![token];
        }
        if self.width(&token.text, token.is_highlight) <= self.max_width {
            return vec![token];
        }

        let mut pieces = Vec::new();
        let mut buffer = String::new();
        for ch in token.text.chars() {
            let mut next = buffer.clone();
            next.push(ch);
            if !buffer.is_empty() && self.width(&next, token.is_highlight) > self.max_width {
                pieces.push(token.fragment(std::mem::take(&mut buffer)));
                buffer.push(ch);
            } else {
                buffer = next;
            }
        }
        if !buffer.is_empty() {
            pieces.push(token.fragment(buffer));
        }
        pieces
    }

    fn break_lines(&self, tokens: Vec<Token>) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut current: Vec<MeasuredToken> = Vec::new();
        let mut width = 0.0;

        for token in tokens.into_iter().flat_map(|t| self.split_token(t)) {
            let tw = self.width(&token.text, token.is_highlight);
            if width + tw > self.max_width && !current.is_empty() {
                log::trace!("line closed at {:.1}px ({} tokens)", width, current.len());
                lines.push(Line { tokens: std::mem::take(&mut current), total_width: width });
                width = 0.0;
            }
            // no leading whitespace on any line
            if current.is_empty() && token.is_space {
                continue;
            }
            current.push(MeasuredToken { token, width: tw });
            width += tw;
        }
        if !current.is_empty() {
            lines.push(Line { tokens: current, total_width: width });
        }
        lines
    }
}

/// Wrap one paragraph's tokens into lines.
pub fn break_paragraph<M: TextMeasurer + ?Sized>(
    tokens: Vec<Token>,
    config: &LayoutConfig,
    measurer: &M,
) -> Result<Vec<Line>> {
    config.validate()?;
    Ok(metrics_for(config, measurer).break_lines(tokens))
}

/// Lay out a full (possibly multi-paragraph) body.
///
/// Paragraphs are separated by `\n` (`\r\n` is normalized first). One
/// [`LayoutItem::ParagraphGap`] separates consecutive paragraphs; none follows
/// the last. Empty text yields an empty result.
pub fn layout<M: TextMeasurer + ?Sized>(config: &LayoutConfig, measurer: &M) -> Result<LayoutResult> {
    config.validate()?;
    let metrics = metrics_for(config, measurer);

    let body = config.text.replace("\r\n", "\n");
    let paragraphs: Vec<&str> = body.split('\n').collect();
    let mut items = Vec::new();
    for (i, paragraph) in paragraphs.iter().enumerate() {
        let tokens = tokenize(paragraph, &config.highlight_word);
        items.extend(metrics.break_lines(tokens).into_iter().map(LayoutItem::Line));
        if i + 1 < paragraphs.len() {
            items.push(LayoutItem::ParagraphGap { multiplier: PARAGRAPH_GAP_MULTIPLIER });
        }
    }
    log::debug!(
        "laid out {} paragraph(s) into {} line(s) at {}px / max {}px ({} measurements cached)",
        paragraphs.len(),
        items.iter().filter(|i| matches!(i, LayoutItem::Line(_))).count(),
        config.font_pixel_size,
        config.max_width,
        metrics.measurer.cached_entries()
    );

    Ok(LayoutResult {
        items,
        max_width: config.max_width,
        font_pixel_size: config.font_pixel_size,
        highlight_pad: config.highlight_pad,
    })
}

fn metrics_for<'a, M: TextMeasurer + ?Sized>(config: &LayoutConfig, measurer: &'a M) -> TokenMetrics<'a, M> {
    TokenMetrics {
        measurer: MemoMeasurer::new(measurer),
        font: FontSpec::new(config.font_pixel_size, config.font_family.clone()),
        highlight_pad: config.highlight_pad,
        fallback_char_ratio: config.fallback_char_ratio,
        max_width: config.max_width,
    }
}
