use super::*;

#[test]
fn check_source_distinguishes_missing_and_unsupported() {
    let dir = tempfile::tempdir().unwrap();

    let err = check_source(&dir.path().join("clip.mp4"), VIDEO_EXTENSIONS).unwrap_err();
    assert!(matches!(err, PromoError::SourceNotFound(_)));

    let mkv = dir.path().join("clip.mkv");
    std::fs::write(&mkv, b"").unwrap();
    let err = check_source(&mkv, VIDEO_EXTENSIONS).unwrap_err();
    assert!(matches!(err, PromoError::UnsupportedFormat(_)));

    let upper = dir.path().join("clip.MOV");
    std::fs::write(&upper, b"").unwrap();
    check_source(&upper, VIDEO_EXTENSIONS).unwrap();
}

#[test]
fn probe_rejects_garbage_video_as_corrupt() {
    if !media_tools_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.mp4");
    std::fs::write(&bad, b"this is not a video").unwrap();
    assert!(matches!(
        probe_video(&bad).unwrap_err(),
        PromoError::CorruptSource(_)
    ));
}

#[test]
fn ff_ratio_parsing() {
    assert_eq!(parse_ff_ratio("30000/1001"), Some((30000, 1001)));
    assert_eq!(parse_ff_ratio("25/0"), None);
    assert_eq!(parse_ff_ratio("abc"), None);
}

#[test]
fn pcm_duration_counts_frames_not_samples() {
    let pcm = AudioPcm {
        sample_rate: 4,
        channels: 2,
        interleaved_f32: vec![0.0; 16],
    };
    assert_eq!(pcm.frames(), 8);
    assert!((pcm.duration_sec() - 2.0).abs() < 1e-12);
}

fn clip(duration_sec: f64) -> VideoSourceInfo {
    VideoSourceInfo {
        source_path: PathBuf::from("pool/7.mp4"),
        width: 720,
        height: 1280,
        fps_num: 25,
        fps_den: 1,
        duration_sec,
    }
}

fn arg_after<'a>(args: &'a [OsString], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|a| a.to_str())
}

#[test]
fn decoder_args_loop_scale_and_cut() {
    let args = build_decoder_args(&clip(5.0), Canvas::CANONICAL, Fps::default(), 3, 240);
    assert_eq!(arg_after(&args, "-stream_loop"), Some("2"));
    assert_eq!(arg_after(&args, "-i"), Some("pool/7.mp4"));
    assert_eq!(
        arg_after(&args, "-vf"),
        Some("scale=1080:1920:flags=bicubic,fps=30/1")
    );
    assert_eq!(arg_after(&args, "-frames:v"), Some("240"));
    assert_eq!(arg_after(&args, "-pix_fmt"), Some("rgba"));
    assert!(args.iter().any(|a| a == "-an"));
    assert_eq!(args.last().and_then(|a| a.to_str()), Some("pipe:1"));

    // Looping is an input option; it must precede the input path.
    let loop_at = args.iter().position(|a| a == "-stream_loop").unwrap();
    let input_at = args.iter().position(|a| a == "-i").unwrap();
    assert!(loop_at < input_at);
}

#[test]
fn decoder_args_play_once_without_extra_loops() {
    for repeats in [0, 1] {
        let args =
            build_decoder_args(&clip(5.0), Canvas::CANONICAL, Fps::default(), repeats, 90);
        assert_eq!(arg_after(&args, "-stream_loop"), Some("0"));
    }
}

#[test]
fn planned_loop_feeds_the_decoder() {
    // 5 s clip, layers ending at 8 s: three back-to-back plays cut at 240 frames.
    let fps = Fps::default();
    let plan = crate::timeline::reconcile::plan_render([8.0], 5.0, None, fps).unwrap();
    let args = build_decoder_args(
        &clip(5.0),
        Canvas::CANONICAL,
        fps,
        plan.video_repeats,
        plan.frame_count,
    );
    assert_eq!(arg_after(&args, "-stream_loop"), Some("2"));
    assert_eq!(arg_after(&args, "-frames:v"), Some("240"));
}
