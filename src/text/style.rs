use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{PromoError, PromoResult};

/// Outline drawn behind the glyph fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Rgba8,
    /// Outline width in output pixels.
    pub width: u32,
}

/// How a text bitmap is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font size in output pixels.
    pub font_size: f32,
    pub color: Rgba8,
    pub stroke: Option<Stroke>,
    /// Counter-clockwise rotation applied to the finished bitmap.
    pub rotation_deg: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 60.0,
            color: Rgba8::WHITE,
            stroke: None,
            rotation_deg: 0.0,
        }
    }
}

impl TextStyle {
    pub fn sized(font_size: f32) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }

    pub fn with_stroke(mut self, color: Rgba8, width: u32) -> Self {
        self.stroke = (width > 0).then_some(Stroke { color, width });
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_deg = degrees;
        self
    }

    pub fn validate(&self) -> PromoResult<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(PromoError::validation(
                "text font_size must be finite and > 0",
            ));
        }
        if !self.rotation_deg.is_finite() {
            return Err(PromoError::validation("text rotation must be finite"));
        }
        Ok(())
    }
}
