use std::path::{Path, PathBuf};

use crate::foundation::error::{PromoError, PromoResult};

/// Font shipped next to the binary; tried before any system font.
pub const BUNDLED_FONT: &str = "assets/fonts/NotoSansSC-Regular.otf";

/// CJK-capable system fonts, most common locations first.
const SYSTEM_FONTS: &[&str] = &[
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\simhei.ttf",
];

/// Bundled font first, then platform system fonts.
pub fn default_font_candidates() -> Vec<PathBuf> {
    std::iter::once(BUNDLED_FONT)
        .chain(SYSTEM_FONTS.iter().copied())
        .map(PathBuf::from)
        .collect()
}

/// A font that loaded and registered a usable family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedFont {
    pub path: PathBuf,
    /// Family name as registered in the layout engine's collection.
    pub family: String,
}

/// Register the first candidate that reads and yields a named family.
///
/// There is no silent fallback: when nothing loads the result is
/// [`PromoError::FontUnavailable`] listing every path tried.
pub fn resolve_font(
    font_ctx: &mut parley::FontContext,
    candidates: &[PathBuf],
) -> PromoResult<ResolvedFont> {
    if candidates.is_empty() {
        return Err(PromoError::font_unavailable("no font candidates configured"));
    }
    for path in candidates {
        match try_register(font_ctx, path) {
            Ok(font) => {
                tracing::debug!(path = %path.display(), family = %font.family, "font resolved");
                return Ok(font);
            }
            Err(reason) => {
                tracing::debug!(path = %path.display(), %reason, "font candidate skipped");
            }
        }
    }
    let tried = candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(PromoError::font_unavailable(format!("tried: {tried}")))
}

fn try_register(font_ctx: &mut parley::FontContext, path: &Path) -> Result<ResolvedFont, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    if bytes.is_empty() {
        return Err("empty file".to_string());
    }

    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| "no font families in file".to_string())?;
    let family = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| "registered font family has no name".to_string())?
        .to_string();

    Ok(ResolvedFont {
        path: path.to_path_buf(),
        family,
    })
}

/// Public-domain Latin font checked in for tests.
#[cfg(test)]
pub(crate) fn fixture_font() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts/Tuffy.ttf")
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
