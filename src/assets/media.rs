use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::assets::decode::lowercase_extension;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{PromoError, PromoResult};

/// Base video containers accepted by the composer.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];
/// Background music formats.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav"];
/// Sample rate every audio track is decoded to.
pub const MIX_SAMPLE_RATE: u32 = 48_000;
/// Channel count every audio track is decoded to.
pub const MIX_CHANNELS: u16 = 2;

#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    pub source_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps_num: u32,
    pub fps_den: u32,
    pub duration_sec: f64,
}

impl VideoSourceInfo {
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }
}

#[derive(Clone, Debug)]
pub struct AudioSourceInfo {
    pub source_path: PathBuf,
    pub duration_sec: f64,
}

/// Interleaved f32 PCM.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    pub sample_rate: u32,
    pub channels: u16,
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.interleaved_f32.len() / usize::from(self.channels)
        }
    }

    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / f64::from(self.sample_rate)
        }
    }
}

/// Reject missing files and extensions outside `allowed`.
pub fn check_source(path: &Path, allowed: &[&str]) -> PromoResult<()> {
    if !path.is_file() {
        return Err(PromoError::source_not_found(path.display().to_string()));
    }
    match lowercase_extension(path) {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
        _ => Err(PromoError::unsupported_format(format!(
            "'{}' (supported: {})",
            path.display(),
            allowed.join(", ")
        ))),
    }
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

fn run_ffprobe(source_path: &Path) -> PromoResult<ProbeOut> {
    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| PromoError::render(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(PromoError::corrupt_source(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    serde_json::from_slice(&out.stdout)
        .map_err(|e| PromoError::corrupt_source(format!("ffprobe json parse failed: {e}")))
}

fn probed_duration(parsed: &ProbeOut, stream: Option<&ProbeStream>) -> Option<f64> {
    parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or_else(|| stream.and_then(|s| s.duration.as_deref()))
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
}

/// Validate and probe a base video clip.
pub fn probe_video(source_path: &Path) -> PromoResult<VideoSourceInfo> {
    check_source(source_path, VIDEO_EXTENSIONS)?;
    let parsed = run_ffprobe(source_path)?;

    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            PromoError::corrupt_source(format!("no video stream in '{}'", source_path.display()))
        })?;
    let (width, height) = match (video_stream.width, video_stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(PromoError::corrupt_source(format!(
                "unreadable dimensions for '{}'",
                source_path.display()
            )));
        }
    };
    let (fps_num, fps_den) =
        parse_ff_ratio(video_stream.r_frame_rate.as_deref().unwrap_or("0/1")).unwrap_or((0, 1));
    let duration_sec = probed_duration(&parsed, Some(video_stream)).ok_or_else(|| {
        PromoError::corrupt_source(format!(
            "unreadable duration for '{}'",
            source_path.display()
        ))
    })?;

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
    })
}

/// Validate and probe a background music file.
pub fn probe_audio(source_path: &Path) -> PromoResult<AudioSourceInfo> {
    check_source(source_path, AUDIO_EXTENSIONS)?;
    let parsed = run_ffprobe(source_path)?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"))
        .ok_or_else(|| {
            PromoError::corrupt_source(format!("no audio stream in '{}'", source_path.display()))
        })?;
    let duration_sec = probed_duration(&parsed, Some(stream)).ok_or_else(|| {
        PromoError::corrupt_source(format!(
            "unreadable duration for '{}'",
            source_path.display()
        ))
    })?;
    Ok(AudioSourceInfo {
        source_path: source_path.to_path_buf(),
        duration_sec,
    })
}

/// Decode a whole audio file to interleaved stereo f32 at `sample_rate`.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> PromoResult<AudioPcm> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &MIX_CHANNELS.to_string(),
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| PromoError::render(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        return Err(PromoError::corrupt_source(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(PromoError::corrupt_source(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    Ok(AudioPcm {
        sample_rate,
        channels: MIX_CHANNELS,
        interleaved_f32: pcm,
    })
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}

/// Decoder arguments: `info` played `repeats` times back to back (at least once), scaled to
/// `canvas`, resampled to `fps`, cut after `max_frames`, as raw RGBA on stdout.
pub fn build_decoder_args(
    info: &VideoSourceInfo,
    canvas: Canvas,
    fps: Fps,
    repeats: u32,
    max_frames: u64,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    let mut push = |s: &str| args.push(OsString::from(s));

    push("-v");
    push("error");
    // `-stream_loop N` plays the input N extra times.
    push("-stream_loop");
    push(&(repeats.max(1) - 1).to_string());
    push("-i");
    args.push(info.source_path.clone().into_os_string());

    let mut push = |s: &str| args.push(OsString::from(s));
    push("-an");
    push("-vf");
    push(&format!(
        "scale={}:{}:flags=bicubic,fps={}/{}",
        canvas.width, canvas.height, fps.num, fps.den
    ));
    push("-frames:v");
    push(&max_frames.to_string());
    for a in ["-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"] {
        push(a);
    }
    args
}

/// Pull-based source of straight RGBA8 base-video frames at the output size.
pub trait FrameSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> PromoResult<Option<Vec<u8>>>;
}

/// Streams a looped, scaled and fps-resampled clip out of a child `ffmpeg`.
///
/// The child is killed when the source is dropped, so an aborted render never leaves a
/// decoder behind.
pub struct FfmpegFrameSource {
    width: u32,
    height: u32,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl FfmpegFrameSource {
    /// Decode `info` played `repeats` times back to back, scaled to `canvas` at `fps`, stopping
    /// after `max_frames`.
    pub fn spawn(
        info: &VideoSourceInfo,
        canvas: Canvas,
        fps: Fps,
        repeats: u32,
        max_frames: u64,
    ) -> PromoResult<Self> {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .args(build_decoder_args(info, canvas, fps, repeats, max_frames));

        let mut child = cmd
            .spawn()
            .map_err(|e| PromoError::render(format!("failed to spawn ffmpeg decoder: {e}")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PromoError::render("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| PromoError::render("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            child: Some(child),
            stdout: Some(stdout),
            stderr_drain: Some(stderr_drain),
        })
    }

    /// Wait for the decoder and surface a non-zero exit as a render error.
    fn finish(&mut self) -> PromoResult<()> {
        drop(self.stdout.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .map_err(|e| PromoError::render(format!("failed to wait for ffmpeg decoder: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| PromoError::render("ffmpeg stderr drain thread panicked"))?
                .unwrap_or_default(),
            None => Vec::new(),
        };
        if !status.success() {
            return Err(PromoError::render(format!(
                "ffmpeg decoder exited with status {}: {}",
                status,
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        Ok(())
    }
}

impl FrameSource for FfmpegFrameSource {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn next_frame(&mut self) -> PromoResult<Option<Vec<u8>>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };
        let mut buf = vec![0u8; self.width as usize * self.height as usize * 4];
        let mut filled = 0;
        while filled < buf.len() {
            let n = stdout
                .read(&mut buf[filled..])
                .map_err(|e| PromoError::render(format!("failed to read decoded frame: {e}")))?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled == buf.len() {
            return Ok(Some(buf));
        }
        self.finish()?;
        Ok(None)
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
    }
}

/// Return `true` when both `ffmpeg` and `ffprobe` can be invoked from `PATH`.
pub fn media_tools_available() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|tool| {
        Command::new(tool)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
