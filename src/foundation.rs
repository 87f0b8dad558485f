//! Shared primitives: error taxonomy, frame timing, canvas geometry, colors and pixel math.

/// Color parsing and serde support for [`core::Rgba8`].
pub mod color;
/// Core value types (`Fps`, `Canvas`, `Rgba8`, ...).
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
/// Integer pixel math helpers.
pub mod math;
