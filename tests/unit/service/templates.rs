use super::*;

#[test]
fn templates_follow_sorted_video_files() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["2.mp4", "1.mov", "intro.avi", "music.mp3", "readme.md"] {
        std::fs::write(dir.path().join(name), b"").unwrap();
    }
    let templates = list_templates(dir.path()).unwrap();
    let ids: Vec<&str> = templates.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "intro"]);
    assert_eq!(templates[0].name, "Template 1");
}

#[test]
fn templates_serialize_as_id_and_name() {
    let t = Template {
        id: "7".to_string(),
        name: "Template 7".to_string(),
    };
    assert_eq!(
        serde_json::to_string(&t).unwrap(),
        r#"{"id":"7","name":"Template 7"}"#
    );
}
