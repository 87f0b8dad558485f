use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Duration, NaiveTime, TimeZone};

use crate::foundation::error::{PromoError, PromoResult};
use crate::service::naming::parse_output_timestamp;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// Delete rendered `.mp4` files in `dir` whose name timestamp is older than `days` days
/// before `now_unix`. `days == 0` deletes every `.mp4`.
///
/// Names without a timestamp are kept; a file that fails to delete is logged and skipped.
/// Returns how many files were removed.
pub fn clean_old_videos(dir: &Path, days: u32, now_unix: i64) -> PromoResult<usize> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "output directory does not exist; nothing to clean");
        return Ok(0);
    }
    let cutoff = now_unix - i64::from(days) * SECS_PER_DAY;

    let mut deleted = 0usize;
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?
    {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.ends_with(".mp4") {
            continue;
        }

        let expired = days == 0 || parse_output_timestamp(name).is_some_and(|ts| ts < cutoff);
        if !expired {
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => {
                deleted += 1;
                tracing::info!(file = name, "deleted expired video");
            }
            Err(err) => tracing::warn!(file = name, %err, "failed to delete video"),
        }
    }
    Ok(deleted)
}

/// Parse a daily `HH:MM` time.
pub fn parse_daily_time(s: &str) -> PromoResult<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|e| PromoError::validation(format!("invalid daily time {s:?} (want HH:MM): {e}")))
}

/// First occurrence of `at` strictly after `now`, in `now`'s time zone.
pub fn next_run_after<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let mut date = now.date_naive();
    loop {
        // A time skipped by a DST jump has no local mapping; try the next day.
        if let Some(candidate) = tz.from_local_datetime(&date.and_time(at)).earliest()
            && candidate > *now
        {
            return candidate;
        }
        date = match date.succ_opt() {
            Some(d) => d,
            None => return now.clone() + Duration::days(1),
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/service/cleanup.rs"]
mod tests;
