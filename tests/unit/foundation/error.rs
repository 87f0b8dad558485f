use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PromoError::source_not_found("x")
            .to_string()
            .contains("source not found:")
    );
    assert!(
        PromoError::unsupported_format("x")
            .to_string()
            .contains("unsupported format:")
    );
    assert!(
        PromoError::corrupt_source("x")
            .to_string()
            .contains("corrupt source:")
    );
    assert!(
        PromoError::font_unavailable("x")
            .to_string()
            .contains("font unavailable:")
    );
    assert!(PromoError::render("x").to_string().contains("render error:"));
    assert!(
        PromoError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PromoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
