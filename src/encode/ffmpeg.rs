use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{PromoError, PromoResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::FrameRGBA;

/// Which H.264 encoder family to drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderProfile {
    /// NVIDIA NVENC.
    Gpu,
    /// libx264.
    Cpu,
}

impl EncoderProfile {
    pub fn codec(self) -> &'static str {
        match self {
            EncoderProfile::Gpu => "h264_nvenc",
            EncoderProfile::Cpu => "libx264",
        }
    }
}

/// Encoder performance and quality knobs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeTuning {
    /// Codec worker threads; `0` lets ffmpeg decide.
    pub threads: u32,
    pub video_bitrate: String,
    pub max_bitrate: String,
    pub buffer_size: String,
    pub audio_bitrate: String,
    pub cpu_preset: String,
    pub cpu_crf: u32,
    pub gpu_preset: String,
}

impl Default for EncodeTuning {
    fn default() -> Self {
        Self {
            threads: 4,
            video_bitrate: "8M".to_string(),
            max_bitrate: "10M".to_string(),
            buffer_size: "16M".to_string(),
            audio_bitrate: "192k".to_string(),
            cpu_preset: "veryfast".to_string(),
            cpu_crf: 23,
            gpu_preset: "p4".to_string(),
        }
    }
}

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    pub profile: EncoderProfile,
    pub tuning: EncodeTuning,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>, profile: EncoderProfile) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
            profile,
            tuning: EncodeTuning::default(),
        }
    }

    pub fn with_tuning(mut self, tuning: EncodeTuning) -> Self {
        self.tuning = tuning;
        self
    }
}

/// Full ffmpeg argument list for one encode.
pub fn build_ffmpeg_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    let mut push = |s: &str| args.push(OsString::from(s));

    push(if opts.overwrite { "-y" } else { "-n" });
    // Input: raw RGBA8 frames, already flattened to opaque in push_frame.
    for a in [
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
        &format!("{}x{}", cfg.width, cfg.height),
        "-r",
        &format!("{}/{}", cfg.fps.num, cfg.fps.den),
        "-i",
        "pipe:0",
    ] {
        push(a);
    }

    if let Some(audio) = cfg.audio.as_ref() {
        for a in [
            "-f",
            "f32le",
            "-ar",
            &audio.sample_rate.to_string(),
            "-ac",
            &audio.channels.to_string(),
            "-i",
        ] {
            push(a);
        }
        args.push(audio.path.clone().into_os_string());
    }

    let t = &opts.tuning;
    let mut push = |s: &str| args.push(OsString::from(s));
    push("-c:v");
    push(opts.profile.codec());
    match opts.profile {
        EncoderProfile::Gpu => {
            for a in ["-preset", t.gpu_preset.as_str(), "-rc", "vbr"] {
                push(a);
            }
        }
        EncoderProfile::Cpu => {
            for a in [
                "-preset",
                t.cpu_preset.as_str(),
                "-crf",
                &t.cpu_crf.to_string(),
            ] {
                push(a);
            }
        }
    }
    for a in [
        "-b:v",
        t.video_bitrate.as_str(),
        "-maxrate",
        t.max_bitrate.as_str(),
        "-bufsize",
        t.buffer_size.as_str(),
        "-threads",
        &t.threads.to_string(),
        "-pix_fmt",
        "yuv420p",
    ] {
        push(a);
    }

    if cfg.audio.is_some() {
        for a in ["-c:a", "aac", "-b:a", t.audio_bitrate.as_str(), "-shortest"] {
            push(a);
        }
    } else {
        push("-an");
    }
    push("-movflags");
    push("+faststart");
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// Sink that spawns the system `ffmpeg` and streams raw frames to stdin.
///
/// Audio is optional and provided through `SinkConfig.audio`. Dropping the sink before `end`
/// kills the encoder.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    pub fn profile(&self) -> EncoderProfile {
        self.opts.profile
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> PromoResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(PromoError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(PromoError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(PromoError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if let Some(audio) = cfg.audio.as_ref()
            && (audio.sample_rate == 0 || audio.channels == 0)
        {
            return Err(PromoError::validation(
                "audio sample_rate/channels must be non-zero when audio is enabled",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(PromoError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(PromoError::render(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args(build_ffmpeg_args(&cfg, &self.opts));

        tracing::debug!(
            codec = self.opts.profile.codec(),
            out = %self.opts.out_path.display(),
            "spawning ffmpeg encoder"
        );
        let mut child = cmd.spawn().map_err(|e| {
            PromoError::render(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| PromoError::render("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| PromoError::render("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.scratch = vec![0u8; (cfg.width * cfg.height * 4) as usize];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> PromoResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| PromoError::render("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(PromoError::render(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(PromoError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(PromoError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        if frame.premultiplied {
            flatten_premul_over_bg_to_opaque_rgba8(
                &mut self.scratch,
                &frame.data,
                self.opts.bg_rgba,
            )?;
        } else {
            self.scratch.copy_from_slice(&frame.data);
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(PromoError::render("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            PromoError::render(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> PromoResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| PromoError::render("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            PromoError::render(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| PromoError::render("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| PromoError::render(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(PromoError::render(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
    }
}

fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> PromoResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(PromoError::validation(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        d[0] = (s[0] as u16 + mul_div255_u16(bg_r, inv)).min(255) as u8;
        d[1] = (s[1] as u16 + mul_div255_u16(bg_g, inv)).min(255) as u8;
        d[2] = (s[2] as u16 + mul_div255_u16(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> PromoResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
