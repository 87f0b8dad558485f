use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::assets::media::{AUDIO_EXTENSIONS, VIDEO_EXTENSIONS};
use crate::assets::pool::{Selector, pick_from_dir};
use crate::config::{AppConfig, SubmissionLayout};
use crate::encode::probe::{AccelProbe, StaticProbe};
use crate::foundation::error::{PromoError, PromoResult};
use crate::service::counter::RenderCounter;
use crate::service::naming::{SUFFIX_RANGE, output_file_name, validate_template_id};
use crate::text::style::TextStyle;
use crate::timeline::composer::Composer;
use crate::timeline::layer::{TextOptions, Timing};

/// One filled-in promo form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Revealed character by character.
    pub typewriter_text: String,
    /// Shown for the whole clip; empty entries are skipped.
    pub static_texts: [String; 3],
    pub template_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub render_count: u64,
    pub video_url: String,
    pub output_path: PathBuf,
}

impl Submission {
    pub fn validate(&self) -> PromoResult<()> {
        validate_template_id(&self.template_id)?;
        if self.typewriter_text.trim().is_empty() {
            return Err(PromoError::validation("typewriter text must be non-empty"));
        }
        Ok(())
    }
}

/// Text layers for a submission as `(text, options)` pairs, typewriter first.
///
/// Every layer ends at `max(native, typing end + hold)` so the finished sentence stays up.
pub fn submission_layers(
    submission: &Submission,
    layout: &SubmissionLayout,
    native_duration: f64,
) -> Vec<(String, TextOptions)> {
    let chars = submission
        .typewriter_text
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .count();
    let typing_end = layout.typing_start + chars as f64 * layout.typing_speed;
    let end = native_duration.max(typing_end + layout.hold_after_typing);

    let style_at = |size: f32| TextStyle::sized(size).with_color(layout.text_color);
    let mut out = vec![(
        submission.typewriter_text.clone(),
        TextOptions::at(
            layout.typewriter_position,
            style_at(layout.typewriter_font_size),
        )
        .timing(Timing::new(layout.typing_start, end))
        .typewriter(layout.typing_speed),
    )];
    for (text, position) in submission
        .static_texts
        .iter()
        .zip(layout.static_positions.iter().copied())
    {
        if text.trim().is_empty() {
            continue;
        }
        out.push((
            text.clone(),
            TextOptions::at(position, style_at(layout.static_font_size))
                .timing(Timing::new(0.0, end)),
        ));
    }
    out
}

/// Render one submission end to end and bump the counter.
#[tracing::instrument(skip_all, fields(template = %submission.template_id))]
pub fn process_submission(
    cfg: &AppConfig,
    submission: &Submission,
    selector: &mut dyn Selector,
    probe: &dyn AccelProbe,
) -> PromoResult<SubmissionResult> {
    submission.validate()?;

    let video = pick_from_dir(&cfg.video_dir, VIDEO_EXTENSIONS, selector)?;
    let audio = pick_from_dir(&cfg.audio_dir, AUDIO_EXTENSIONS, selector)?;
    tracing::info!(video = %video.display(), audio = %audio.display(), "assets picked");

    let mut composer = Composer::open(&video, cfg.composer_opts(Some(audio)))?;
    let native = composer.native_duration()?;
    for (text, opts) in submission_layers(submission, &cfg.layout, native) {
        composer.add_text(&text, &opts)?;
    }

    let suffix = selector.pick_in_range(*SUFFIX_RANGE.start(), *SUFFIX_RANGE.end());
    let file_name = output_file_name(
        &submission.template_id,
        chrono::Utc::now().timestamp(),
        suffix,
    )?;
    let output_path = cfg.output_dir.join(&file_name);

    let cpu_only = StaticProbe(false);
    let probe: &dyn AccelProbe = if cfg.force_cpu { &cpu_only } else { probe };
    let summary = composer.render(&output_path, probe)?;

    let render_count = RenderCounter::open(&cfg.counter_file)?.increment()?;
    tracing::info!(
        out = %summary.output_path.display(),
        render_count,
        held_frames = summary.held_frames,
        "submission rendered"
    );
    Ok(SubmissionResult {
        render_count,
        video_url: format!("/download/{file_name}"),
        output_path,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/service/submission.rs"]
mod tests;
