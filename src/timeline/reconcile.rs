use crate::assets::media::AudioPcm;
use crate::foundation::core::Fps;
use crate::foundation::error::{PromoError, PromoResult};

/// Everything the render loop needs to know about the output length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderPlan {
    /// Longest layer end, or the native video duration when there are no layers.
    pub target_duration: f64,
    /// Encoded length: the target when it exceeds the native video, the native video otherwise.
    pub output_duration: f64,
    /// Whole-clip plays fed to the decoder.
    pub video_repeats: u32,
    /// Whole-track plays before truncating the audio, if there is audio.
    pub audio_repeats: Option<u32>,
    pub frame_count: u64,
}

impl RenderPlan {
    /// Whether the base clip has to loop to cover the layers.
    pub fn loops_video(&self) -> bool {
        self.video_repeats > 1
    }
}

/// Max of `layer_ends`, or `native` when there are none.
pub fn target_duration(layer_ends: impl IntoIterator<Item = f64>, native: f64) -> f64 {
    layer_ends.into_iter().fold(None, |acc: Option<f64>, end| {
        Some(acc.map_or(end, |a| a.max(end)))
    })
    .unwrap_or(native)
}

/// Number of whole plays of a `native`-long clip to cover `target`.
///
/// When looping is needed this is `ceil(target / native) + 1`; the extra play keeps decoder
/// rounding from ever running short before the truncation point.
pub fn loop_repeats(target: f64, native: f64) -> u32 {
    if native <= 0.0 || target <= native {
        return 1;
    }
    ((target / native).ceil() as u32).saturating_add(1)
}

/// Reconcile layer timing with the base video and optional audio durations.
pub fn plan_render(
    layer_ends: impl IntoIterator<Item = f64>,
    video_native: f64,
    audio_native: Option<f64>,
    fps: Fps,
) -> PromoResult<RenderPlan> {
    if !video_native.is_finite() || video_native <= 0.0 {
        return Err(PromoError::corrupt_source(format!(
            "video duration {video_native} must be positive"
        )));
    }
    let target = target_duration(layer_ends, video_native);
    if !target.is_finite() || target <= 0.0 {
        return Err(PromoError::validation(format!(
            "timeline duration {target} must be positive"
        )));
    }

    let (output_duration, video_repeats) = if target > video_native {
        (target, loop_repeats(target, video_native))
    } else {
        (video_native, 1)
    };
    // Audio always ends with the output: looped when shorter, truncated when longer.
    let audio_repeats = audio_native.map(|a| loop_repeats(output_duration, a));

    Ok(RenderPlan {
        target_duration: target,
        output_duration,
        video_repeats,
        audio_repeats,
        frame_count: fps.secs_to_frames_round(output_duration).max(1),
    })
}

/// Play `pcm` back to back `repeats` times, then cut to exactly `duration_sec`.
///
/// An empty source yields silence of the requested length.
pub fn loop_and_truncate_pcm(pcm: &AudioPcm, repeats: u32, duration_sec: f64) -> AudioPcm {
    let channels = usize::from(pcm.channels.max(1));
    let target_frames = (duration_sec.max(0.0) * f64::from(pcm.sample_rate)).round() as usize;
    let target_len = target_frames * channels;

    let src = &pcm.interleaved_f32[..pcm.frames() * channels];
    let mut out = Vec::with_capacity(target_len);
    if !src.is_empty() {
        for _ in 0..repeats.max(1) {
            if out.len() >= target_len {
                break;
            }
            out.extend_from_slice(src);
        }
    }
    out.resize(target_len, 0.0);

    AudioPcm {
        sample_rate: pcm.sample_rate,
        channels: pcm.channels,
        interleaved_f32: out,
    }
}

/// One character-reveal state of a typewriter layer.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealStep {
    /// Text visible in this state.
    pub prefix: String,
    pub start: f64,
    pub end: f64,
}

/// Additive reveal: step `i` shows the first `i + 1` visible characters from
/// `start + i * speed` until the shared `end`.
///
/// Line breaks are carried inside the prefixes but do not get a step of their own.
pub fn typewriter_schedule(
    text: &str,
    start: f64,
    end: f64,
    speed: f64,
) -> PromoResult<Vec<RevealStep>> {
    if !speed.is_finite() || speed < 0.0 {
        return Err(PromoError::validation(format!(
            "typing speed {speed} must be finite and >= 0"
        )));
    }

    let mut steps = Vec::new();
    for (byte_idx, ch) in text.char_indices() {
        if ch == '\n' || ch == '\r' {
            continue;
        }
        let i = steps.len();
        steps.push(RevealStep {
            prefix: text[..byte_idx + ch.len_utf8()].to_string(),
            start: start + i as f64 * speed,
            end,
        });
    }

    if steps.is_empty() {
        return Err(PromoError::validation("typewriter text has no characters"));
    }
    if let Some(last) = steps.last()
        && last.start >= end
    {
        return Err(PromoError::validation(format!(
            "typewriter reveal of {} characters starting at {start}s does not finish before {end}s",
            steps.len()
        )));
    }
    Ok(steps)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/reconcile.rs"]
mod tests;
