//! Application configuration: JSON file, `PROMOCLIP_*` environment overrides, defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::fonts::default_font_candidates;
use crate::encode::ffmpeg::EncodeTuning;
use crate::foundation::core::{Canvas, Fps, Rgba8};
use crate::foundation::error::{PromoError, PromoResult};
use crate::layout::position::Position;
use crate::text::raster::DEFAULT_RASTER_SCALE;
use crate::timeline::composer::ComposerOpts;

/// Top-level configuration for the service and CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base video pool; each file is a template.
    pub video_dir: PathBuf,
    /// Background music pool.
    pub audio_dir: PathBuf,
    /// Where rendered videos are written.
    pub output_dir: PathBuf,
    pub counter_file: PathBuf,
    /// Font candidates, tried in order.
    pub fonts: Vec<PathBuf>,
    pub canvas: Canvas,
    pub fps: Fps,
    pub raster_scale: u32,
    /// Skip the hardware probe and always encode on the CPU.
    pub force_cpu: bool,
    pub layout: SubmissionLayout,
    pub cleanup: CleanupConfig,
    pub encode: EncodeTuning,
    pub logging: LoggingConfig,
}

/// Where and how submission texts are placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionLayout {
    pub typewriter_position: Position,
    pub typewriter_font_size: f32,
    /// Seconds per revealed character.
    pub typing_speed: f64,
    /// Delay before the first character appears.
    pub typing_start: f64,
    /// Seconds the finished typewriter text stays up before the video may end.
    pub hold_after_typing: f64,
    pub static_positions: [Position; 3],
    pub static_font_size: f32,
    pub text_color: Rgba8,
}

/// Retention sweep settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    pub retention_days: u32,
    /// Daily run time as `HH:MM` local time.
    pub daily_at: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "promoclip=debug,warn").
    pub level: String,
    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            video_dir: PathBuf::from("asset/video"),
            audio_dir: PathBuf::from("asset/audio"),
            output_dir: PathBuf::from("output"),
            counter_file: PathBuf::from("data/render_count.txt"),
            fonts: default_font_candidates(),
            canvas: Canvas::CANONICAL,
            fps: Fps::default(),
            raster_scale: DEFAULT_RASTER_SCALE,
            force_cpu: false,
            layout: SubmissionLayout::default(),
            cleanup: CleanupConfig::default(),
            encode: EncodeTuning::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SubmissionLayout {
    fn default() -> Self {
        Self {
            typewriter_position: Position::percent(10.0, 20.0),
            typewriter_font_size: 80.0,
            typing_speed: 0.3,
            typing_start: 1.0,
            hold_after_typing: 1.0,
            static_positions: [
                Position::percent(10.0, 40.0),
                Position::percent(10.0, 60.0),
                Position::percent(10.0, 80.0),
            ],
            static_font_size: 60.0,
            text_color: Rgba8::WHITE,
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            retention_days: 3,
            daily_at: "02:00".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Read `path` when given (defaults otherwise), then apply `PROMOCLIP_*` overrides.
    pub fn load(path: Option<&Path>) -> PromoResult<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> PromoResult<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        serde_json::from_str(&content).map_err(|e| {
            PromoError::validation(format!("invalid config '{}': {e}", path.display()))
        })
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> PromoResult<()> {
        if let Some(v) = lookup("PROMOCLIP_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("PROMOCLIP_VIDEO_DIR") {
            self.video_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("PROMOCLIP_AUDIO_DIR") {
            self.audio_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("PROMOCLIP_THREADS") {
            self.encode.threads = v.trim().parse().map_err(|_| {
                PromoError::validation(format!("PROMOCLIP_THREADS must be an integer, got {v:?}"))
            })?;
        }
        if let Some(v) = lookup("PROMOCLIP_FONT") {
            // An explicit font goes ahead of every other candidate.
            self.fonts.insert(0, PathBuf::from(v));
        }
        Ok(())
    }

    pub fn validate(&self) -> PromoResult<()> {
        self.canvas.validate()?;
        if self.raster_scale == 0 {
            return Err(PromoError::validation("raster_scale must be >= 1"));
        }
        let l = &self.layout;
        if !l.typing_speed.is_finite() || l.typing_speed < 0.0 {
            return Err(PromoError::validation("typing_speed must be finite and >= 0"));
        }
        if !l.typing_start.is_finite() || l.typing_start < 0.0 {
            return Err(PromoError::validation("typing_start must be finite and >= 0"));
        }
        if !l.hold_after_typing.is_finite() || l.hold_after_typing < 0.0 {
            return Err(PromoError::validation(
                "hold_after_typing must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Composer options for one render with the given background music.
    pub fn composer_opts(&self, audio: Option<PathBuf>) -> ComposerOpts {
        ComposerOpts {
            canvas: self.canvas,
            fps: self.fps,
            font_candidates: self.fonts.clone(),
            raster_scale: self.raster_scale,
            audio,
            tuning: self.encode.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
