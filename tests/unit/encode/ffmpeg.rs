use super::*;
use crate::encode::sink::AudioInputConfig;
use crate::foundation::core::Fps;

fn cfg(audio: bool) -> SinkConfig {
    SinkConfig {
        width: 1080,
        height: 1920,
        fps: Fps::new(30, 1).unwrap(),
        audio: audio.then(|| AudioInputConfig {
            path: PathBuf::from("/tmp/mix.f32le"),
            sample_rate: 48_000,
            channels: 2,
        }),
    }
}

fn args_of(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<String> {
    build_ffmpeg_args(cfg, opts)
        .into_iter()
        .map(|s| s.to_string_lossy().into_owned())
        .collect()
}

fn value_after(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

#[test]
fn gpu_profile_uses_nvenc_vbr() {
    let opts = FfmpegSinkOpts::new("out/video.mp4", EncoderProfile::Gpu);
    let args = args_of(&cfg(true), &opts);
    assert_eq!(value_after(&args, "-c:v").as_deref(), Some("h264_nvenc"));
    assert_eq!(value_after(&args, "-preset").as_deref(), Some("p4"));
    assert_eq!(value_after(&args, "-rc").as_deref(), Some("vbr"));
    assert!(!args.contains(&"-crf".to_string()));
}

#[test]
fn cpu_profile_uses_libx264_crf() {
    let opts = FfmpegSinkOpts::new("out/video.mp4", EncoderProfile::Cpu);
    let args = args_of(&cfg(true), &opts);
    assert_eq!(value_after(&args, "-c:v").as_deref(), Some("libx264"));
    assert_eq!(value_after(&args, "-preset").as_deref(), Some("veryfast"));
    assert_eq!(value_after(&args, "-crf").as_deref(), Some("23"));
}

#[test]
fn tuning_and_output_flags_are_applied() {
    let tuning = EncodeTuning {
        threads: 8,
        video_bitrate: "6M".to_string(),
        ..EncodeTuning::default()
    };
    let opts = FfmpegSinkOpts::new("out/video.mp4", EncoderProfile::Cpu).with_tuning(tuning);
    let args = args_of(&cfg(true), &opts);
    assert_eq!(value_after(&args, "-threads").as_deref(), Some("8"));
    assert_eq!(value_after(&args, "-b:v").as_deref(), Some("6M"));
    assert_eq!(value_after(&args, "-maxrate").as_deref(), Some("10M"));
    assert_eq!(value_after(&args, "-bufsize").as_deref(), Some("16M"));
    assert_eq!(value_after(&args, "-pix_fmt").as_deref(), Some("rgba"));
    assert_eq!(value_after(&args, "-movflags").as_deref(), Some("+faststart"));
    assert_eq!(value_after(&args, "-c:a").as_deref(), Some("aac"));
    assert_eq!(value_after(&args, "-b:a").as_deref(), Some("192k"));
    assert_eq!(value_after(&args, "-s").as_deref(), Some("1080x1920"));
    assert_eq!(value_after(&args, "-r").as_deref(), Some("30/1"));
    assert_eq!(args.first().map(String::as_str), Some("-y"));
    assert_eq!(args.last().map(String::as_str), Some("out/video.mp4"));
    assert!(args.iter().any(|a| a == "yuv420p"));
}

#[test]
fn audio_input_follows_video_input() {
    let opts = FfmpegSinkOpts::new("o.mp4", EncoderProfile::Cpu);
    let args = args_of(&cfg(true), &opts);
    let inputs: Vec<usize> = args
        .iter()
        .enumerate()
        .filter(|(_, a)| *a == "-i")
        .map(|(i, _)| i)
        .collect();
    assert_eq!(inputs.len(), 2);
    assert_eq!(args[inputs[0] + 1], "pipe:0");
    assert_eq!(args[inputs[1] + 1], "/tmp/mix.f32le");
    assert_eq!(value_after(&args, "-ac").as_deref(), Some("2"));
}

#[test]
fn silent_output_drops_audio_stream() {
    let opts = FfmpegSinkOpts::new("o.mp4", EncoderProfile::Cpu);
    let args = args_of(&cfg(false), &opts);
    assert!(args.contains(&"-an".to_string()));
    assert!(!args.contains(&"-c:a".to_string()));
}

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn begin_rejects_odd_dimensions() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("o.mp4", EncoderProfile::Cpu));
    let mut c = cfg(false);
    c.width = 101;
    assert!(matches!(
        sink.begin(c).unwrap_err(),
        PromoError::Validation(_)
    ));
}
