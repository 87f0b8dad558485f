use super::*;

#[test]
fn default_candidates_start_with_bundled_font() {
    let c = default_font_candidates();
    assert_eq!(c[0], PathBuf::from(BUNDLED_FONT));
    assert!(c.len() > 1);
}

#[test]
fn no_loadable_candidate_is_font_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let garbage = dir.path().join("garbage.ttf");
    std::fs::write(&garbage, b"definitely not a font").unwrap();
    let candidates = vec![dir.path().join("missing.ttf"), garbage];

    let mut ctx = parley::FontContext::default();
    let err = resolve_font(&mut ctx, &candidates).unwrap_err();
    assert!(matches!(err, PromoError::FontUnavailable(_)));
    assert!(err.to_string().contains("missing.ttf"));
}

#[test]
fn empty_candidate_list_is_font_unavailable() {
    let mut ctx = parley::FontContext::default();
    assert!(matches!(
        resolve_font(&mut ctx, &[]).unwrap_err(),
        PromoError::FontUnavailable(_)
    ));
}

#[test]
fn last_present_candidate_wins() {
    let dir = tempfile::tempdir().unwrap();
    let garbage = dir.path().join("b.otf");
    std::fs::write(&garbage, b"not a font").unwrap();
    let candidates = vec![dir.path().join("a.ttf"), garbage, fixture_font()];

    let mut ctx = parley::FontContext::default();
    let font = resolve_font(&mut ctx, &candidates).unwrap();
    assert_eq!(font.path, fixture_font());
    assert_eq!(font.family, "Tuffy");
}

#[test]
fn first_loadable_candidate_wins_over_later_ones() {
    let mut ctx = parley::FontContext::default();
    let font = resolve_font(
        &mut ctx,
        &[fixture_font(), PathBuf::from("/nonexistent/other.ttf")],
    )
    .unwrap();
    assert_eq!(font.path, fixture_font());
}
