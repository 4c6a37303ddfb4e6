//! Text measurement capability supplied by the host rendering surface.
//!
//! Layout never touches a real canvas. Every call receives a [`TextMeasurer`]
//! explicitly, which keeps the engine testable with a deterministic fake and
//! lets the preview and export paths share one measurement source.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

use crate::{Error, Result};

/// Font family stack used for body text, mirroring the system UI stack.
pub const DEFAULT_FONT_FAMILY: &str =
    "system-ui, -apple-system, Segoe UI, Roboto, Noto Sans, Arial, sans-serif";

/// A concrete font: pixel size plus family. Weight only matters to painters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub pixel_size: f64,
    pub family: String,
    #[serde(default)]
    pub bold: bool,
}

impl FontSpec {
    pub fn new(pixel_size: f64, family: impl Into<String>) -> Self {
        Self {
            pixel_size,
            family: family.into(),
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Returns the rendered pixel width of a string in a given font.
///
/// Implementations may fail for strings containing characters the font has no
/// metrics for; layout then falls back to per-character estimation.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<f64>;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<f64> {
        (**self).measure(text, font)
    }
}

/// Every character advances by `ratio × font size`.
///
/// This is the deterministic measurer used by tests and benchmarks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMeasurer {
    pub ratio: f64,
}

impl FixedAdvanceMeasurer {
    pub fn new(ratio: f64) -> Self {
        Self { ratio }
    }
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self { ratio: 0.6 }
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<f64> {
        Ok(self.ratio * font.pixel_size * text.chars().count() as f64)
    }
}

/// Rough estimate for hosts without font access (the CLI).
///
/// Full-width characters (CJK, most emoji) take one em, everything else
/// `narrow_ratio` em. Control characters have no metrics and are reported as a
/// measurement failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicMeasurer {
    pub narrow_ratio: f64,
}

impl Default for HeuristicMeasurer {
    fn default() -> Self {
        Self { narrow_ratio: 0.55 }
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<f64> {
        let mut ems = 0.0;
        for ch in text.chars() {
            match ch.width() {
                Some(2) => ems += 1.0,
                Some(0) => {}
                Some(_) => ems += self.narrow_ratio,
                None => {
                    return Err(Error::Measure(format!(
                        "no metrics for control character U+{:04X}",
                        ch as u32
                    )))
                }
            }
        }
        Ok(ems * font.pixel_size)
    }
}

/// Memoizing wrapper keyed by `(fragment, font size, family)`.
///
/// Character-level splitting re-measures the same prefixes heavily. The cache
/// lives for one layout call and is not shared between calls.
pub struct MemoMeasurer<'a, M: TextMeasurer + ?Sized> {
    inner: &'a M,
    cache: RefCell<HashMap<(String, u64, String), f64>>,
}

impl<'a, M: TextMeasurer + ?Sized> MemoMeasurer<'a, M> {
    pub fn new(inner: &'a M) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for MemoMeasurer<'_, M> {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<f64> {
        let key = (text.to_string(), font.pixel_size.to_bits(), font.family.clone());
        if let Some(w) = self.cache.borrow().get(&key) {
            return Ok(*w);
        }
        // Failures are not cached so the fallback path sees them every time.
        let w = self.inner.measure(text, font)?;
        self.cache.borrow_mut().insert(key, w);
        Ok(w)
    }
}

/// Measures `text`, degrading gracefully when the measurer fails.
///
/// On failure each character is measured on its own; a character that still
/// fails is estimated as `fallback_ratio × font size`.
pub fn measure_or_estimate<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    font: &FontSpec,
    fallback_ratio: f64,
) -> f64 {
    match measurer.measure(text, font) {
        Ok(w) => w,
        Err(e) => {
            log::debug!("measuring {:?} failed ({}); estimating per character", text, e);
            let mut buf = [0u8; 4];
            text.chars()
                .map(|ch| {
                    measurer
                        .measure(ch.encode_utf8(&mut buf), font)
                        .unwrap_or(fallback_ratio * font.pixel_size)
                })
                .sum()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingMeasurer {
        calls: Cell<usize>,
    }

    impl TextMeasurer for CountingMeasurer {
        fn measure(&self, text: &str, font: &FontSpec) -> Result<f64> {
            self.calls.set(self.calls.get() + 1);
            Ok(text.len() as f64 * font.pixel_size)
        }
    }

    #[test]
    fn fixed_advance_counts_chars_not_bytes() {
        let m = FixedAdvanceMeasurer::default();
        let font = FontSpec::new(40.0, DEFAULT_FONT_FAMILY);
        assert_eq!(m.measure("hello", &font).unwrap(), 120.0);
        assert_eq!(m.measure("高亮", &font).unwrap(), 48.0);
    }

    #[test]
    fn heuristic_treats_cjk_as_full_width() {
        let m = HeuristicMeasurer::default();
        let font = FontSpec::new(100.0, DEFAULT_FONT_FAMILY);
        assert_eq!(m.measure("高亮", &font).unwrap(), 200.0);
        assert!((m.measure("ab", &font).unwrap() - 110.0).abs() < 1e-9);
        assert!(m.measure("a\u{7}", &font).is_err());
    }

    #[test]
    fn memo_measurer_hits_cache() {
        let inner = CountingMeasurer { calls: Cell::new(0) };
        let memo = MemoMeasurer::new(&inner);
        let font = FontSpec::new(10.0, "x");
        memo.measure("abc", &font).unwrap();
        memo.measure("abc", &font).unwrap();
        memo.measure("abc", &FontSpec::new(12.0, "x")).unwrap();
        assert_eq!(inner.calls.get(), 2);
        assert_eq!(memo.cached_entries(), 2);
    }

    #[test]
    fn estimate_falls_back_per_character() {
        let m = HeuristicMeasurer::default();
        let font = FontSpec::new(10.0, "x");
        // 'a' measures 5.5, the bell character falls back to 0.6 em
        let w = measure_or_estimate(&m, "a\u{7}", &font, 0.6);
        assert!((w - 11.5).abs() < 1e-9);
    }
}
