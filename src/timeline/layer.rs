use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{PromoError, PromoResult};
use crate::layout::position::{ImagePlacement, Position, SizeSpec};
use crate::layout::zone::Zone;
use crate::render::bitmap::Bitmap;
use crate::text::style::TextStyle;

/// Start and optional end of a layer, in seconds on the output timeline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub start: f64,
    /// `None` ends the layer with the base video's native duration.
    pub end: Option<f64>,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: None,
        }
    }
}

impl Timing {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn from_start(start: f64) -> Self {
        Self { start, end: None }
    }

    /// Concrete `(start, end)`, checking `0 <= start < end`.
    pub fn resolve(self, native_duration: f64) -> PromoResult<(f64, f64)> {
        let end = self.end.unwrap_or(native_duration);
        if !self.start.is_finite() || !end.is_finite() {
            return Err(PromoError::validation("layer timing must be finite"));
        }
        if self.start < 0.0 {
            return Err(PromoError::validation(format!(
                "layer start {} must be >= 0",
                self.start
            )));
        }
        if self.start >= end {
            return Err(PromoError::validation(format!(
                "layer start {} must be before end {end}",
                self.start
            )));
        }
        Ok((self.start, end))
    }
}

/// Character-by-character reveal settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Typewriter {
    /// Seconds between successive characters.
    pub speed: f64,
}

/// Everything `add_text` needs besides the string itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextOptions {
    pub position: Position,
    /// Explicit stroke wins; otherwise the zone's default applies.
    pub style: TextStyle,
    pub zone: Zone,
    pub timing: Timing,
    pub typewriter: Option<Typewriter>,
    /// Center over this image instead of using `position`.
    pub center_on: Option<ImagePlacement>,
}

impl TextOptions {
    pub fn at(position: Position, style: TextStyle) -> Self {
        Self {
            position,
            style,
            zone: Zone::Generic,
            timing: Timing::default(),
            typewriter: None,
            center_on: None,
        }
    }

    pub fn zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    pub fn timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn typewriter(mut self, speed: f64) -> Self {
        self.typewriter = Some(Typewriter { speed });
        self
    }

    pub fn center_on(mut self, image: Option<ImagePlacement>) -> Self {
        self.center_on = image;
        self
    }
}

/// Everything `add_image` needs besides the path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageOptions {
    pub position: Position,
    /// `None` keeps the source size.
    pub size: Option<SizeSpec>,
    pub timing: Timing,
}

impl ImageOptions {
    pub fn at(position: Position) -> Self {
        Self {
            position,
            size: None,
            timing: Timing::default(),
        }
    }

    pub fn size(mut self, size: SizeSpec) -> Self {
        self.size = Some(size);
        self
    }

    pub fn timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }
}

/// What a layer was built from.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerKind {
    Image {
        source: PathBuf,
    },
    Text {
        text: String,
        /// Zero-based reveal step for typewriter sub-layers.
        reveal_step: Option<usize>,
    },
}

/// A positioned bitmap visible on `[start, end)`.
#[derive(Clone, Debug)]
pub struct Layer {
    pub bitmap: Bitmap,
    pub x: i64,
    pub y: i64,
    pub start: f64,
    pub end: f64,
    pub kind: LayerKind,
}

impl Layer {
    pub fn visible_at(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/layer.rs"]
mod tests;
