use std::path::PathBuf;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{PromoError, PromoResult};
use crate::render::FrameRGBA;

/// Configuration provided to a [`FrameSink`] at the start of a render.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Optional raw PCM audio file muxed alongside the frames.
    pub audio: Option<AudioInputConfig>,
}

/// Raw PCM audio input for sinks that encode audio.
#[derive(Debug, Clone)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Sink contract for consuming composed frames in timeline order.
///
/// `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> PromoResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> PromoResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> PromoResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    /// Audio samples read back from the configured PCM file when the sink ends.
    audio: Option<Vec<f32>>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames in timeline order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Interleaved PCM captured at `end`.
    pub fn audio(&self) -> Option<&[f32]> {
        self.audio.as_deref()
    }

    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> PromoResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.audio = None;
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> PromoResult<()> {
        if let Some((last, _)) = self.frames.last()
            && idx.0 <= last.0
        {
            return Err(PromoError::render("sink received out-of-order frame index"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> PromoResult<()> {
        // The PCM file only lives for the duration of the render, so read it back now.
        if let Some(audio) = self.cfg.as_ref().and_then(|c| c.audio.as_ref()) {
            let bytes = std::fs::read(&audio.path)
                .map_err(|e| PromoError::render(format!("read pcm back: {e}")))?;
            self.audio = Some(
                bytes
                    .chunks_exact(4)
                    .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            );
        }
        self.ended = true;
        Ok(())
    }
}
