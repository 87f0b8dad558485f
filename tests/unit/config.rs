use std::collections::HashMap;

use super::*;
use crate::layout::position::Coord;

#[test]
fn defaults_match_the_submission_form() {
    let cfg = AppConfig::default();
    assert_eq!(cfg.canvas, Canvas::CANONICAL);
    assert_eq!(cfg.layout.typewriter_position, Position::percent(10.0, 20.0));
    assert_eq!(cfg.layout.typing_speed, 0.3);
    assert_eq!(cfg.layout.static_positions[2].y, Coord::Percent(80.0));
    assert_eq!(cfg.cleanup.retention_days, 3);
    assert_eq!(cfg.cleanup.daily_at, "02:00");
    cfg.validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg: AppConfig = serde_json::from_str(
        r#"{
            "output_dir": "/srv/out",
            "layout": { "typing_speed": 0.2, "typewriter_position": { "x": 20, "y": "25%" } },
            "encode": { "threads": 2 }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.output_dir, PathBuf::from("/srv/out"));
    assert_eq!(cfg.layout.typing_speed, 0.2);
    assert_eq!(cfg.layout.typewriter_position.x, Coord::Px(20.0));
    assert_eq!(cfg.layout.typewriter_font_size, 80.0);
    assert_eq!(cfg.encode.threads, 2);
    assert_eq!(cfg.encode.cpu_crf, 23);
    assert_eq!(cfg.video_dir, PathBuf::from("asset/video"));
}

#[test]
fn env_overrides_apply() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("PROMOCLIP_OUTPUT_DIR", "/tmp/out"),
        ("PROMOCLIP_THREADS", "6"),
        ("PROMOCLIP_FONT", "/fonts/brand.otf"),
    ]);
    let mut cfg = AppConfig::default();
    cfg.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();
    assert_eq!(cfg.output_dir, PathBuf::from("/tmp/out"));
    assert_eq!(cfg.encode.threads, 6);
    assert_eq!(cfg.fonts[0], PathBuf::from("/fonts/brand.otf"));
    assert_eq!(cfg.video_dir, PathBuf::from("asset/video"));
}

#[test]
fn bad_env_value_is_validation_error() {
    let mut cfg = AppConfig::default();
    let err = cfg
        .apply_env(|k| (k == "PROMOCLIP_THREADS").then(|| "many".to_string()))
        .unwrap_err();
    assert!(matches!(err, PromoError::Validation(_)));
}

#[test]
fn config_file_round_trip_and_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("promoclip.json");
    let cfg = AppConfig {
        force_cpu: true,
        ..AppConfig::default()
    };
    std::fs::write(&path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();
    assert_eq!(AppConfig::from_file(&path).unwrap(), cfg);

    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        AppConfig::from_file(&path).unwrap_err(),
        PromoError::Validation(_)
    ));
}

#[test]
fn composer_opts_carry_config() {
    let cfg = AppConfig::default();
    let opts = cfg.composer_opts(Some(PathBuf::from("a.mp3")));
    assert_eq!(opts.canvas, cfg.canvas);
    assert_eq!(opts.font_candidates, cfg.fonts);
    assert_eq!(opts.audio, Some(PathBuf::from("a.mp3")));
}
