use chrono::{TimeZone, Utc};

use super::*;

const NOW: i64 = 1_700_000_000;

fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), b"").unwrap();
}

fn names(dir: &Path) -> Vec<String> {
    let mut v: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    v.sort();
    v
}

#[test]
fn removes_only_videos_older_than_cutoff() {
    let dir = tempfile::tempdir().unwrap();
    let old = NOW - 4 * SECS_PER_DAY;
    let fresh = NOW - SECS_PER_DAY;
    touch(dir.path(), &format!("video_1_{old}_1234.mp4"));
    touch(dir.path(), &format!("video_2_{fresh}_5678.mp4"));
    touch(dir.path(), "manual.mp4");
    touch(dir.path(), &format!("video_1_{old}_1111.txt"));

    let deleted = clean_old_videos(dir.path(), 3, NOW).unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(names(dir.path()), vec![
        "manual.mp4".to_string(),
        format!("video_1_{old}_1111.txt"),
        format!("video_2_{fresh}_5678.mp4"),
    ]);
}

#[test]
fn zero_days_removes_every_mp4() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), &format!("video_1_{NOW}_1234.mp4"));
    touch(dir.path(), "manual.mp4");
    touch(dir.path(), "keep.mov");
    assert_eq!(clean_old_videos(dir.path(), 0, NOW).unwrap(), 2);
    assert_eq!(names(dir.path()), vec!["keep.mov".to_string()]);
}

#[test]
fn missing_directory_cleans_nothing() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        clean_old_videos(&dir.path().join("output"), 3, NOW).unwrap(),
        0
    );
}

#[test]
fn daily_time_parsing() {
    assert_eq!(
        parse_daily_time("02:00").unwrap(),
        NaiveTime::from_hms_opt(2, 0, 0).unwrap()
    );
    assert!(parse_daily_time("25:00").is_err());
    assert!(parse_daily_time("2am").is_err());
}

#[test]
fn next_run_is_today_or_tomorrow() {
    let at = NaiveTime::from_hms_opt(2, 0, 0).unwrap();

    let before = Utc.with_ymd_and_hms(2024, 5, 10, 1, 30, 0).unwrap();
    assert_eq!(
        next_run_after(&before, at),
        Utc.with_ymd_and_hms(2024, 5, 10, 2, 0, 0).unwrap()
    );

    let exactly = Utc.with_ymd_and_hms(2024, 5, 10, 2, 0, 0).unwrap();
    assert_eq!(
        next_run_after(&exactly, at),
        Utc.with_ymd_and_hms(2024, 5, 11, 2, 0, 0).unwrap()
    );

    let after = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
    assert_eq!(
        next_run_after(&after, at),
        Utc.with_ymd_and_hms(2025, 1, 1, 2, 0, 0).unwrap()
    );
}
