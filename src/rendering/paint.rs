//! Paint command set shared by the export and preview surfaces

use serde::{Deserialize, Serialize};

use crate::measure::FontSpec;

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// CSS-style `rgba(r, g, b, alpha)` with alpha in `0.0..=1.0`.
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self { r, g, b, a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8 }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => {
                let mut c = [0u8; 3];
                for (i, ch) in hex.chars().enumerate() {
                    let v = ch.to_digit(16)? as u8;
                    c[i] = v * 17;
                }
                Some(Rgba::rgb(c[0], c[1], c[2]))
            }
            6 => Some(Rgba::rgb(digit(0)?, digit(2)?, digit(4)?)),
            8 => Some(Rgba { r: digit(0)?, g: digit(2)?, b: digit(4)?, a: digit(6)? }),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fill {
    Solid(Rgba),
    /// Linear gradient along `from → to` in surface coordinates.
    LinearGradient {
        from: (f64, f64),
        to: (f64, f64),
        stops: Vec<GradientStop>,
    },
}

impl Fill {
    pub fn gradient(from: (f64, f64), to: (f64, f64), colors: &[(f64, Rgba)]) -> Self {
        Fill::LinearGradient {
            from,
            to,
            stops: colors.iter().map(|&(offset, color)| GradientStop { offset, color }).collect(),
        }
    }

    /// Color of the fill at a point.
    pub fn color_at(&self, x: f64, y: f64) -> Rgba {
        match self {
            Fill::Solid(c) => *c,
            Fill::LinearGradient { from, to, stops } => {
                let (dx, dy) = (to.0 - from.0, to.1 - from.1);
                let len2 = dx * dx + dy * dy;
                let t = if len2 == 0.0 {
                    0.0
                } else {
                    (((x - from.0) * dx + (y - from.1) * dy) / len2).clamp(0.0, 1.0)
                };
                sample_stops(stops, t)
            }
        }
    }
}

fn sample_stops(stops: &[GradientStop], t: f64) -> Rgba {
    let Some(first) = stops.first() else {
        return Rgba { r: 0, g: 0, b: 0, a: 0 };
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let k = if span <= 0.0 { 1.0 } else { (t - a.offset) / span };
            let lerp = |p: u8, q: u8| (p as f64 + (q as f64 - p as f64) * k).round() as u8;
            return Rgba {
                r: lerp(a.color.r, b.color.r),
                g: lerp(a.color.g, b.color.g),
                b: lerp(a.color.b, b.color.b),
                a: lerp(a.color.a, b.color.a),
            };
        }
    }
    stops[stops.len() - 1].color
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Rgba,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Shadow {
    pub fn scaled(self, s: f64) -> Self {
        Shadow { blur: self.blur * s, offset_x: self.offset_x * s, offset_y: self.offset_y * s, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PaintCommand {
    FillRect {
        rect: Rect,
        fill: Fill,
    },
    FillRoundedRect {
        rect: Rect,
        radius: f64,
        fill: Fill,
        shadow: Option<Shadow>,
    },
    StrokeRoundedRect {
        rect: Rect,
        radius: f64,
        stroke: Stroke,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        stroke: Stroke,
    },
    /// Text with its top edge at `y`; `x` is the left edge or the centre.
    Text {
        x: f64,
        y: f64,
        text: String,
        font: FontSpec,
        fill: Fill,
        align: TextAlign,
        shadow: Option<Shadow>,
    },
    /// Emoji glyph with its top-left at `(x, y)`, rotated about that point.
    Emoji {
        x: f64,
        y: f64,
        symbol: String,
        size: f64,
        rotation_deg: f64,
    },
}

/// Ordered paint commands for one surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayList {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<PaintCommand>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, commands: Vec::new() }
    }

    pub fn push(&mut self, cmd: PaintCommand) {
        self.commands.push(cmd);
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            PaintCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
