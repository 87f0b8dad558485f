//! `promoclip` turns a short form submission into a vertical promo video.
//!
//! The crate is organized as a pipeline:
//! - assets: decode images, probe and decode video/audio, resolve fonts, pick from pools
//! - text: rasterize styled (stroked, rotated) text into premultiplied bitmaps
//! - timeline: layers with time windows, duration reconciliation, per-frame compositing
//! - encode: stream frames plus looped audio into `ffmpeg`, NVENC when available
//! - service: submission flow, output naming, render counter, retention sweep
//!
//! Video and audio work shells out to `ffmpeg`/`ffprobe`; everything else is in-process.
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod encode;
pub mod foundation;
pub mod layout;
pub mod logging;
pub mod render;
pub mod service;
pub mod text;
pub mod timeline;

pub use assets::decode::SourceImage;
pub use assets::fonts::{ResolvedFont, default_font_candidates};
pub use assets::media::{AudioSourceInfo, FrameSource, VideoSourceInfo, media_tools_available};
pub use assets::pool::{FixedSelector, RandomSelector, Selector};
pub use config::{AppConfig, CleanupConfig, LoggingConfig, SubmissionLayout};
pub use encode::ffmpeg::{EncodeTuning, EncoderProfile, FfmpegSink, FfmpegSinkOpts};
pub use encode::probe::{AccelProbe, NvencProbe, StaticProbe};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Canvas, Fps, Rgba8};
pub use foundation::error::{PromoError, PromoResult};
pub use layout::position::{Coord, ImagePlacement, Position, SizeSpec};
pub use layout::zone::Zone;
pub use logging::init_logging;
pub use render::bitmap::Bitmap;
pub use service::cleanup::{clean_old_videos, next_run_after, parse_daily_time};
pub use service::counter::RenderCounter;
pub use service::naming::output_file_name;
pub use service::submission::{Submission, SubmissionResult, process_submission};
pub use service::templates::{Template, list_templates};
pub use text::raster::{TextRasterize, TextRasterizer};
pub use text::style::{Stroke, TextStyle};
pub use timeline::composer::{Composer, ComposerOpts, RenderSummary};
pub use timeline::layer::{ImageOptions, Layer, TextOptions, Timing};
