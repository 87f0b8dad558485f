//! Canvas-space placement: coordinate resolution, clamping and zone-driven text wrapping.

/// Absolute/percentage coordinates, sizes and placement on the canvas.
pub mod position;
/// Layout zones and character-count line wrapping.
pub mod zone;
