//! Text bitmaps: style parameters and the supersampled glyph rasterizer.

/// Supersampled rasterization of text into premultiplied bitmaps.
pub mod raster;
/// Fill, stroke and rotation parameters for text layers.
pub mod style;
