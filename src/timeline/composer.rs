use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::decode::SourceImage;
use crate::assets::fonts::default_font_candidates;
use crate::assets::media::{
    AudioSourceInfo, FfmpegFrameSource, FrameSource, MIX_CHANNELS, MIX_SAMPLE_RATE,
    VideoSourceInfo, decode_audio_f32_stereo, probe_audio, probe_video,
};
use crate::encode::ffmpeg::{EncodeTuning, EncoderProfile, FfmpegSink, FfmpegSinkOpts};
use crate::encode::probe::{AccelProbe, select_profile};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{PromoError, PromoResult};
use crate::layout::position::{ImagePlacement, center_over, place};
use crate::render::FrameRGBA;
use crate::render::bitmap::Bitmap;
use crate::render::composite::over_at;
use crate::text::raster::{DEFAULT_RASTER_SCALE, TextRasterize, TextRasterizer};
use crate::timeline::layer::{ImageOptions, Layer, LayerKind, TextOptions};
use crate::timeline::reconcile::{
    RenderPlan, loop_and_truncate_pcm, plan_render, typewriter_schedule,
};

/// Composer construction options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerOpts {
    pub canvas: Canvas,
    pub fps: Fps,
    /// Tried in order; the first loadable font is used.
    pub font_candidates: Vec<PathBuf>,
    /// Supersampling factor for text.
    pub raster_scale: u32,
    /// Background music; `None` renders a silent video.
    pub audio: Option<PathBuf>,
    pub tuning: EncodeTuning,
}

impl Default for ComposerOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::CANONICAL,
            fps: Fps::default(),
            font_candidates: default_font_candidates(),
            raster_scale: DEFAULT_RASTER_SCALE,
            audio: None,
            tuning: EncodeTuning::default(),
        }
    }
}

/// Outcome of a successful render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSummary {
    pub output_path: PathBuf,
    pub frames: u64,
    pub duration_sec: f64,
    pub profile: EncoderProfile,
    /// Frames that repeated the last decoded picture because the decoder ran short.
    pub held_frames: u64,
}

/// Owns one base clip, an optional audio track and an ordered list of overlay layers.
///
/// Insertion order is paint order. Every resource is released by [`Composer::render`] on all
/// exit paths, by [`Composer::cleanup`], or on drop, whichever comes first.
pub struct Composer {
    opts: ComposerOpts,
    video: Option<VideoSourceInfo>,
    audio: Option<AudioSourceInfo>,
    rasterizer: Option<Box<dyn TextRasterize>>,
    layers: Vec<Layer>,
    last_image: Option<ImagePlacement>,
}

impl Composer {
    /// Probe `video_path` (and the configured audio) and load a font.
    #[tracing::instrument(skip(opts), fields(video = %video_path.display()))]
    pub fn open(video_path: &Path, opts: ComposerOpts) -> PromoResult<Self> {
        opts.canvas.validate()?;
        let video = probe_video(video_path)?;
        let audio = opts.audio.as_deref().map(probe_audio).transpose()?;
        let rasterizer = TextRasterizer::new(&opts.font_candidates, opts.raster_scale)?;
        tracing::info!(
            width = video.width,
            height = video.height,
            duration = video.duration_sec,
            audio = audio.is_some(),
            font = %rasterizer.font_path().display(),
            "composer opened"
        );
        Ok(Self::from_parts(video, audio, Box::new(rasterizer), opts))
    }

    /// Assemble from already-probed sources and any rasterizer.
    pub fn from_parts(
        video: VideoSourceInfo,
        audio: Option<AudioSourceInfo>,
        rasterizer: Box<dyn TextRasterize>,
        opts: ComposerOpts,
    ) -> Self {
        Self {
            opts,
            video: Some(video),
            audio,
            rasterizer: Some(rasterizer),
            layers: Vec::new(),
            last_image: None,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.opts.canvas
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Placement of the most recently added image, for `TextOptions::center_on`.
    pub fn last_image(&self) -> Option<ImagePlacement> {
        self.last_image
    }

    pub fn is_released(&self) -> bool {
        self.video.is_none()
    }

    pub fn native_duration(&self) -> PromoResult<f64> {
        Ok(self.live_video()?.duration_sec)
    }

    fn live_video(&self) -> PromoResult<&VideoSourceInfo> {
        self.video
            .as_ref()
            .ok_or_else(|| PromoError::validation("composer resources already released"))
    }

    /// Register a text layer, or one sub-layer per revealed character for a typewriter.
    #[tracing::instrument(level = "debug", skip(self, opts), fields(chars = text.chars().count()))]
    pub fn add_text(&mut self, text: &str, opts: &TextOptions) -> PromoResult<()> {
        let native = self.live_video()?.duration_sec;
        let canvas = self.opts.canvas;
        let (start, end) = opts.timing.resolve(native)?;

        let wrapped = opts.zone.wrap(text);
        let mut style = opts.style;
        if style.stroke.is_none() {
            style.stroke = opts.zone.default_stroke();
        }

        let rasterizer = self
            .rasterizer
            .as_mut()
            .ok_or_else(|| PromoError::validation("composer resources already released"))?;

        let position_for = |bmp: &Bitmap| match opts.center_on {
            Some(image) => center_over(image, bmp.width, bmp.height, canvas),
            None => place(opts.position, bmp.height, canvas),
        };

        // Build every bitmap first so a failure leaves the layer list untouched.
        let mut new_layers = Vec::new();
        match opts.typewriter {
            Some(tw) => {
                for (i, step) in typewriter_schedule(&wrapped, start, end, tw.speed)?
                    .into_iter()
                    .enumerate()
                {
                    let bitmap = rasterizer.rasterize(&step.prefix, &style)?;
                    let (x, y) = position_for(&bitmap);
                    new_layers.push(Layer {
                        bitmap,
                        x,
                        y,
                        start: step.start,
                        end: step.end,
                        kind: LayerKind::Text {
                            text: step.prefix,
                            reveal_step: Some(i),
                        },
                    });
                }
            }
            None => {
                let bitmap = rasterizer.rasterize(&wrapped, &style)?;
                let (x, y) = position_for(&bitmap);
                new_layers.push(Layer {
                    bitmap,
                    x,
                    y,
                    start,
                    end,
                    kind: LayerKind::Text {
                        text: wrapped,
                        reveal_step: None,
                    },
                });
            }
        }

        tracing::debug!(
            layers = new_layers.len(),
            start,
            end,
            zone = ?opts.zone,
            "text layer added"
        );
        self.layers.extend(new_layers);
        Ok(())
    }

    /// Register an image layer and remember where it landed.
    #[tracing::instrument(level = "debug", skip(self, opts), fields(path = %path.display()))]
    pub fn add_image(&mut self, path: &Path, opts: &ImageOptions) -> PromoResult<ImagePlacement> {
        let native = self.live_video()?.duration_sec;
        let canvas = self.opts.canvas;
        let (start, end) = opts.timing.resolve(native)?;

        let source = SourceImage::open(path)?;
        let (src_w, src_h) = source.size();
        let (width, height) = match opts.size {
            Some(size) => size.resolve(canvas, src_w, src_h)?,
            None => (src_w, src_h),
        };
        let bitmap = source.to_bitmap(width, height)?;
        let (x, y) = place(opts.position, height, canvas);

        let placement = ImagePlacement {
            x,
            y,
            width,
            height,
        };
        self.layers.push(Layer {
            bitmap,
            x,
            y,
            start,
            end,
            kind: LayerKind::Image {
                source: path.to_path_buf(),
            },
        });
        self.last_image = Some(placement);
        tracing::debug!(x, y, width, height, start, end, "image layer added");
        Ok(placement)
    }

    /// Reconcile layer ends with the base video and audio durations.
    pub fn plan(&self) -> PromoResult<RenderPlan> {
        let video = self.live_video()?;
        plan_render(
            self.layers.iter().map(|l| l.end),
            video.duration_sec,
            self.audio.as_ref().map(|a| a.duration_sec),
            self.opts.fps,
        )
    }

    /// Encode the composite to `output_path`.
    ///
    /// Resources are released whether or not the encode succeeds; the composer cannot render
    /// twice.
    #[tracing::instrument(skip(self, probe), fields(out = %output_path.display()))]
    pub fn render(
        &mut self,
        output_path: &Path,
        probe: &dyn AccelProbe,
    ) -> PromoResult<RenderSummary> {
        let result = self.render_inner(output_path, probe);
        self.cleanup();
        result
    }

    fn render_inner(
        &mut self,
        output_path: &Path,
        probe: &dyn AccelProbe,
    ) -> PromoResult<RenderSummary> {
        let plan = self.plan()?;
        let video = self.live_video()?;
        let profile = select_profile(probe);
        tracing::info!(
            layers = self.layers.len(),
            duration = plan.output_duration,
            frames = plan.frame_count,
            video_repeats = plan.video_repeats,
            codec = profile.codec(),
            "render started"
        );

        // Lives until the sink has finished reading it.
        let pcm_file = match (self.audio.as_ref(), plan.audio_repeats) {
            (Some(audio), Some(repeats)) => Some(write_looped_pcm(
                &audio.source_path,
                repeats,
                plan.output_duration,
            )?),
            _ => None,
        };
        let audio_cfg = pcm_file.as_ref().map(|f| AudioInputConfig {
            path: f.path().to_path_buf(),
            sample_rate: MIX_SAMPLE_RATE,
            channels: MIX_CHANNELS,
        });

        let mut source = FfmpegFrameSource::spawn(
            video,
            self.opts.canvas,
            self.opts.fps,
            plan.video_repeats,
            plan.frame_count,
        )?;
        let mut sink = FfmpegSink::new(
            FfmpegSinkOpts::new(output_path, profile).with_tuning(self.opts.tuning.clone()),
        );
        let held_frames = compose(
            &self.layers,
            &plan,
            self.opts.fps,
            &mut source,
            &mut sink,
            audio_cfg,
        )?;

        tracing::info!(out = %output_path.display(), frames = plan.frame_count, "render finished");
        Ok(RenderSummary {
            output_path: output_path.to_path_buf(),
            frames: plan.frame_count,
            duration_sec: plan.output_duration,
            profile,
            held_frames,
        })
    }

    /// Release the video, audio, rasterizer and every layer. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        if self.video.is_none() {
            return;
        }
        self.video = None;
        self.audio = None;
        self.rasterizer = None;
        self.layers.clear();
        self.last_image = None;
        tracing::debug!("composer resources released");
    }
}

impl Drop for Composer {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Composite `layers` over the base frames and feed the sink.
///
/// Layers visible at a frame's timestamp paint in insertion order. If the source runs dry
/// before `plan.frame_count` frames, the last frame is held; the held count is returned.
pub fn compose(
    layers: &[Layer],
    plan: &RenderPlan,
    fps: Fps,
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    audio: Option<AudioInputConfig>,
) -> PromoResult<u64> {
    let (width, height) = (source.width(), source.height());
    let frame_len = width as usize * height as usize * 4;
    sink.begin(SinkConfig {
        width,
        height,
        fps,
        audio,
    })?;

    let mut base = vec![0u8; frame_len];
    let mut have_base = false;
    let mut held = 0u64;
    let mut frame = FrameRGBA {
        width,
        height,
        data: vec![0u8; frame_len],
        premultiplied: true,
    };

    for i in 0..plan.frame_count {
        match source.next_frame()? {
            Some(decoded) => {
                if decoded.len() != frame_len {
                    return Err(PromoError::render(format!(
                        "decoded frame has {} bytes, expected {frame_len}",
                        decoded.len()
                    )));
                }
                base = decoded;
                have_base = true;
            }
            None if have_base => held += 1,
            None => return Err(PromoError::render("video decoder produced no frames")),
        }

        // Base video is opaque, so straight and premultiplied bytes agree.
        frame.data.copy_from_slice(&base);
        let t = fps.frames_to_secs(i);
        for layer in layers.iter().filter(|l| l.visible_at(t)) {
            over_at(&mut frame.data, width, height, &layer.bitmap, layer.x, layer.y)?;
        }
        sink.push_frame(FrameIndex(i), &frame)?;
    }

    if held > 0 {
        tracing::warn!(held, "video decoder ended early; held the last frame");
    }
    sink.end()?;
    Ok(held)
}

/// Decode, loop and truncate the audio into a scratch `.f32le` file removed on drop.
fn write_looped_pcm(
    path: &Path,
    repeats: u32,
    duration_sec: f64,
) -> PromoResult<tempfile::NamedTempFile> {
    let pcm = decode_audio_f32_stereo(path, MIX_SAMPLE_RATE)?;
    let looped = loop_and_truncate_pcm(&pcm, repeats, duration_sec);
    tracing::debug!(
        source_sec = pcm.duration_sec(),
        repeats,
        output_sec = looped.duration_sec(),
        "audio reconciled"
    );

    let mut file = tempfile::Builder::new()
        .prefix("promoclip-audio-")
        .suffix(".f32le")
        .tempfile()
        .context("create scratch pcm file")?;
    let mut bytes = Vec::with_capacity(looped.interleaved_f32.len() * 4);
    for s in &looped.interleaved_f32 {
        bytes.extend_from_slice(&s.to_le_bytes());
    }
    file.write_all(&bytes).context("write scratch pcm file")?;
    file.flush().context("flush scratch pcm file")?;
    Ok(file)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/composer.rs"]
mod tests;
