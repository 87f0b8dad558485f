//! Pixel-level building blocks: premultiplied bitmaps, compositing and output frames.

/// Premultiplied RGBA8 bitmaps and resampling.
pub mod bitmap;
/// Source-over compositing of bitmaps onto frames.
pub mod composite;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the flag makes this explicit at sink boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}
