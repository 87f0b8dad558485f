use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{PromoError, PromoResult};
use crate::render::bitmap::Bitmap;

/// Extensions decoded through `image`.
pub const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// A still image loaded from disk, not yet sized for the canvas.
#[derive(Clone, Debug)]
pub enum SourceImage {
    Raster(Bitmap),
    Svg(Arc<usvg::Tree>),
}

impl SourceImage {
    /// Load a raster image or SVG, choosing the decoder by extension.
    pub fn open(path: &Path) -> PromoResult<Self> {
        if !path.is_file() {
            return Err(PromoError::source_not_found(path.display().to_string()));
        }
        let ext = lowercase_extension(path);
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        match ext.as_deref() {
            Some("svg") => parse_svg(&bytes)
                .map(|tree| Self::Svg(Arc::new(tree)))
                .map_err(|err| PromoError::corrupt_source(format!("{}: {err}", path.display()))),
            Some(e) if RASTER_EXTENSIONS.contains(&e) => decode_image(&bytes)
                .map(Self::Raster)
                .map_err(|err| PromoError::corrupt_source(format!("{}: {err}", path.display()))),
            _ => Err(PromoError::unsupported_format(format!(
                "'{}' is not a supported image type",
                path.display()
            ))),
        }
    }

    /// Natural size in pixels (SVG sizes are rounded up).
    pub fn size(&self) -> (u32, u32) {
        match self {
            Self::Raster(b) => (b.width, b.height),
            Self::Svg(tree) => {
                let s = tree.size();
                (
                    (s.width().ceil() as u32).max(1),
                    (s.height().ceil() as u32).max(1),
                )
            }
        }
    }

    /// Produce a bitmap of exactly `width x height`.
    pub fn to_bitmap(&self, width: u32, height: u32) -> PromoResult<Bitmap> {
        match self {
            Self::Raster(b) => b.resize_lanczos(width, height),
            Self::Svg(tree) => {
                let data = rasterize_svg_to_premul_rgba8(tree, width, height)?;
                Bitmap::new(width, height, data)
            }
        }
    }
}

/// Decode encoded raster bytes (PNG, JPEG, ...) into a premultiplied bitmap.
pub fn decode_image(bytes: &[u8]) -> PromoResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Bitmap::from_straight_image(dyn_img.to_rgba8())
}

pub fn parse_svg(bytes: &[u8]) -> PromoResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Render an SVG tree scaled to fill `width x height`.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> PromoResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PromoError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

pub(crate) fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
