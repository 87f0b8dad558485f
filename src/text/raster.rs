use std::path::{Path, PathBuf};

use crate::assets::fonts::{ResolvedFont, resolve_font};
use crate::foundation::core::Affine;
use crate::foundation::error::{PromoError, PromoResult};
use crate::render::bitmap::{Bitmap, affine_to_cpu, to_u16};
use crate::text::style::TextStyle;

/// Internal supersampling factor used unless configured otherwise.
pub const DEFAULT_RASTER_SCALE: u32 = 3;

/// Padding on every side, relative to the scaled font size.
const PADDING_RATIO: f32 = 0.3;
const SHARPEN_SIGMA: f32 = 0.8;
const SHARPEN_THRESHOLD: i32 = 2;

/// Turns a string plus style into a premultiplied bitmap.
pub trait TextRasterize {
    fn rasterize(&mut self, text: &str, style: &TextStyle) -> PromoResult<Bitmap>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// Supersampled text rasterizer.
///
/// Glyphs are laid out with parley and painted with vello_cpu at `scale` times the requested
/// size, then downsampled with Lanczos3 and sharpened. Small CJK strokes stay legible this way
/// where direct low-resolution rendering smears them.
pub struct TextRasterizer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    font: ResolvedFont,
    scale: u32,
}

impl TextRasterizer {
    /// Resolve the first loadable font among `candidates`.
    pub fn new(candidates: &[PathBuf], scale: u32) -> PromoResult<Self> {
        if scale == 0 {
            return Err(PromoError::validation("raster scale must be >= 1"));
        }
        let mut font_ctx = parley::FontContext::default();
        let font = resolve_font(&mut font_ctx, candidates)?;
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            font,
            scale,
        })
    }

    pub fn font_path(&self) -> &Path {
        &self.font.path
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        layout
    }
}

impl TextRasterize for TextRasterizer {
    #[tracing::instrument(level = "trace", skip(self, style), fields(chars = text.chars().count()))]
    fn rasterize(&mut self, text: &str, style: &TextStyle) -> PromoResult<Bitmap> {
        style.validate()?;
        if text.is_empty() {
            return Err(PromoError::validation("cannot rasterize empty text"));
        }

        let scale = self.scale as f32;
        let size = style.font_size * scale;
        let brush = TextBrushRgba8 {
            r: style.color.r,
            g: style.color.g,
            b: style.color.b,
            a: style.color.a,
        };
        let layout = self.layout(text, size, brush);

        let mut text_w = 0.0f32;
        let mut text_h = 0.0f32;
        for line in layout.lines() {
            let m = line.metrics();
            text_w = text_w.max(m.advance);
            text_h += m.ascent + m.descent + m.leading;
        }

        let stroke = style.stroke.filter(|s| s.width > 0);
        let stroke_radius = stroke.map_or(0, |s| s.width * self.scale);
        let extent = padded_extent(text_w, text_h, size, stroke_radius);
        let w16 = to_u16(extent.width, "text bitmap width")?;
        let h16 = to_u16(extent.height, "text bitmap height")?;
        let origin = f64::from(extent.pad);

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);

        // Outline first: the glyphs stamped on a disc of offsets, then the fill on top.
        if let Some(stroke) = stroke {
            let c = stroke.color;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
            let r = stroke_radius as i32;
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy > r * r {
                        continue;
                    }
                    ctx.set_transform(affine_to_cpu(Affine::translate((
                        origin + f64::from(dx),
                        origin + f64::from(dy),
                    ))));
                    paint_glyphs(&mut ctx, &layout, false);
                }
            }
        }

        ctx.set_transform(affine_to_cpu(Affine::translate((origin, origin))));
        paint_glyphs(&mut ctx, &layout, true);
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);
        let big = Bitmap::new(
            extent.width,
            extent.height,
            pixmap.data_as_u8_slice().to_vec(),
        )?;

        let out = if self.scale > 1 {
            let out_w = (extent.width as f32 / scale).round().max(1.0) as u32;
            let out_h = (extent.height as f32 / scale).round().max(1.0) as u32;
            big.resize_lanczos(out_w, out_h)?
                .sharpen(SHARPEN_SIGMA, SHARPEN_THRESHOLD)?
        } else {
            big
        };

        out.rotate_expand(style.rotation_deg)
    }
}

/// Paint every glyph run at its pen position on the line baseline. Each run uses the font
/// parley resolved for it, which is a system fallback for characters the primary font lacks.
fn paint_glyphs(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrushRgba8>,
    use_brush: bool,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            if use_brush {
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
            }
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(run.run().font())
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

/// Supersampled canvas size around a measured text box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PaddedExtent {
    /// Offset of the text origin from the top-left corner, in scaled pixels.
    pub(crate) pad: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

pub(crate) fn padded_extent(
    text_w: f32,
    text_h: f32,
    scaled_size: f32,
    stroke_radius: u32,
) -> PaddedExtent {
    let pad = (scaled_size * PADDING_RATIO).ceil() as u32 + stroke_radius;
    let width = text_w.max(0.0).ceil() as u32 + 2 * pad;
    let height = text_h.max(0.0).ceil() as u32 + 2 * pad;
    PaddedExtent {
        pad,
        width: width.max(1),
        height: height.max(1),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/raster.rs"]
mod tests;
