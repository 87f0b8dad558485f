//! Output side: frame sinks, the ffmpeg H.264/AAC encoder and hardware capability probing.

/// System `ffmpeg` encoder sink with GPU and CPU profiles.
pub mod ffmpeg;
/// Hardware encoder capability probe.
pub mod probe;
/// Frame sink contract and in-memory sink.
pub mod sink;
