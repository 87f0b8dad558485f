use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Canvas;
use crate::foundation::error::{PromoError, PromoResult};

/// One axis of a position or size: absolute pixels or a percentage of the canvas extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Coord {
    /// Absolute pixels.
    Px(f64),
    /// Percentage (`10.0` means 10%) of the canvas width or height.
    Percent(f64),
}

impl Coord {
    /// Resolve against `extent` (canvas width for x, height for y), truncating toward zero.
    pub fn resolve(self, extent: u32) -> i64 {
        match self {
            Coord::Px(v) => v.trunc() as i64,
            Coord::Percent(p) => (p * f64::from(extent) / 100.0).trunc() as i64,
        }
    }
}

impl FromStr for Coord {
    type Err = PromoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (num, pct) = match s.strip_suffix('%') {
            Some(n) => (n.trim(), true),
            None => (s, false),
        };
        let v: f64 = num
            .parse()
            .map_err(|_| PromoError::validation(format!("invalid coordinate \"{s}\"")))?;
        if !v.is_finite() {
            return Err(PromoError::validation(format!(
                "coordinate \"{s}\" must be finite"
            )));
        }
        Ok(if pct { Coord::Percent(v) } else { Coord::Px(v) })
    }
}

impl Serialize for Coord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match *self {
            Coord::Px(v) => serializer.serialize_f64(v),
            Coord::Percent(p) => serializer.serialize_str(&format!("{p}%")),
        }
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Str(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(v) => Ok(Coord::Px(v)),
            Repr::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Requested top-left position of a layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}

impl Position {
    pub fn px(x: f64, y: f64) -> Self {
        Self {
            x: Coord::Px(x),
            y: Coord::Px(y),
        }
    }

    pub fn percent(x: f64, y: f64) -> Self {
        Self {
            x: Coord::Percent(x),
            y: Coord::Percent(y),
        }
    }

    /// Parse a pair such as `("10%", "20%")` or `("108", "384")`.
    pub fn parse(x: &str, y: &str) -> PromoResult<Self> {
        Ok(Self {
            x: x.parse()?,
            y: y.parse()?,
        })
    }

    /// Absolute pixel position before any clamping.
    pub fn resolve(self, canvas: Canvas) -> (i64, i64) {
        (self.x.resolve(canvas.width), self.y.resolve(canvas.height))
    }
}

/// Requested size of an image layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeSpec {
    /// Explicit width and height.
    Exact { width: Coord, height: Coord },
    /// Width only; height follows the source aspect ratio.
    Width(Coord),
}

impl SizeSpec {
    /// Resolve to pixels for a source of `src_width x src_height`.
    pub fn resolve(self, canvas: Canvas, src_width: u32, src_height: u32) -> PromoResult<(u32, u32)> {
        let (w, h) = match self {
            SizeSpec::Exact { width, height } => {
                (width.resolve(canvas.width), height.resolve(canvas.height))
            }
            SizeSpec::Width(width) => {
                let w = width.resolve(canvas.width);
                if src_width == 0 {
                    return Err(PromoError::validation("source image has zero width"));
                }
                let h = (w as f64 * f64::from(src_height) / f64::from(src_width)).round() as i64;
                (w, h)
            }
        };
        if w <= 0 || h <= 0 {
            return Err(PromoError::validation(format!(
                "resolved image size {w}x{h} must be positive"
            )));
        }
        let w = u32::try_from(w)
            .map_err(|_| PromoError::validation(format!("image width {w} too large")))?;
        let h = u32::try_from(h)
            .map_err(|_| PromoError::validation(format!("image height {h} too large")))?;
        Ok((w, h))
    }
}

/// Where an image layer landed on the canvas; text can be centered over it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePlacement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Keep a bitmap of `height` fully inside the canvas vertically.
///
/// A bitmap taller than the canvas is pinned to the top edge.
pub fn clamp_y(y: i64, height: u32, canvas: Canvas) -> i64 {
    let max_y = i64::from(canvas.height) - i64::from(height);
    y.min(max_y).max(0)
}

/// Final top-left corner for a bitmap of `height` requested at `pos`.
///
/// Only y is clamped; x may run past the horizontal edges.
pub fn place(pos: Position, height: u32, canvas: Canvas) -> (i64, i64) {
    let (x, y) = pos.resolve(canvas);
    (x, clamp_y(y, height, canvas))
}

/// Top-left corner that centers a `width x height` bitmap over `image`.
pub fn center_over(image: ImagePlacement, width: u32, height: u32, canvas: Canvas) -> (i64, i64) {
    let x = image.x + (i64::from(image.width) - i64::from(width)) / 2;
    let y = image.y + (i64::from(image.height) - i64::from(height)) / 2;
    (x, clamp_y(y, height, canvas))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/position.rs"]
mod tests;
