//! Source assets: still images, media probing and decoding, fonts and random asset pools.

/// Still image and SVG decoding into premultiplied bitmaps.
pub mod decode;
/// Ordered font candidate resolution.
pub mod fonts;
/// `ffprobe`/`ffmpeg` backed video and audio access.
pub mod media;
/// Directory listings and injected random selection.
pub mod pool;
