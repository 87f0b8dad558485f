use std::sync::Arc;

use crate::foundation::core::Affine;
use crate::foundation::error::{PromoError, PromoResult};
use crate::foundation::math::{clamp_premul_in_place, premultiply_rgba8_in_place};

#[derive(Clone, Debug, PartialEq)]
/// Raster bitmap in premultiplied RGBA8 form.
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Bitmap {
    /// Wrap premultiplied bytes, checking the buffer length against the dimensions.
    pub fn new(width: u32, height: u32, rgba8_premul: Vec<u8>) -> PromoResult<Self> {
        if width == 0 || height == 0 {
            return Err(PromoError::validation("bitmap width/height must be non-zero"));
        }
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(PromoError::validation(format!(
                "bitmap byte length mismatch: got {}, expected {}x{}x4",
                rgba8_premul.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Fully transparent bitmap.
    pub fn transparent(width: u32, height: u32) -> PromoResult<Self> {
        Self::new(width, height, vec![0u8; width as usize * height as usize * 4])
    }

    /// Convert a straight-alpha `image` buffer.
    pub fn from_straight_image(img: image::RgbaImage) -> PromoResult<Self> {
        let (width, height) = img.dimensions();
        let mut data = img.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Self::new(width, height, data)
    }

    /// Un-premultiplied copy, e.g. for writing a PNG.
    pub fn to_straight_image(&self) -> PromoResult<image::RgbaImage> {
        let mut data = self.rgba8_premul.as_ref().clone();
        for px in data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| PromoError::validation("bitmap buffer does not match its dimensions"))
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let d = &self.rgba8_premul[i..i + 4];
        [d[0], d[1], d[2], d[3]]
    }

    /// Bounding box of pixels with non-zero alpha as `(x0, y0, x1, y1)`, exclusive max.
    pub fn opaque_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.pixel(x, y)[3] == 0 {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, y, x + 1, y + 1),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
                });
            }
        }
        bounds
    }

    /// Resample with a Lanczos3 filter. Filtering runs on premultiplied data so edges do not
    /// pick up fringe colors from transparent pixels.
    pub fn resize_lanczos(&self, width: u32, height: u32) -> PromoResult<Self> {
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let resized = image::imageops::resize(
            &self.as_image()?,
            width.max(1),
            height.max(1),
            image::imageops::FilterType::Lanczos3,
        );
        let (w, h) = resized.dimensions();
        let mut data = resized.into_raw();
        clamp_premul_in_place(&mut data);
        Self::new(w, h, data)
    }

    /// Unsharp mask to recover edge contrast lost to downsampling.
    pub fn sharpen(&self, sigma: f32, threshold: i32) -> PromoResult<Self> {
        let sharpened = image::imageops::unsharpen(&self.as_image()?, sigma, threshold);
        let mut data = sharpened.into_raw();
        clamp_premul_in_place(&mut data);
        Self::new(self.width, self.height, data)
    }

    /// Rotate by `degrees` counter-clockwise around the center, growing the canvas so no corner
    /// is cropped.
    pub fn rotate_expand(&self, degrees: f64) -> PromoResult<Self> {
        if !degrees.is_finite() {
            return Err(PromoError::validation("rotation must be finite"));
        }
        if degrees.rem_euclid(360.0) == 0.0 {
            return Ok(self.clone());
        }

        // y points down, so a negative kurbo angle turns counter-clockwise on screen.
        let theta = -degrees.to_radians();
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let (s, c) = theta.sin_cos();
        // Trim float noise so right angles do not grow an extra pixel.
        let out_w = (w * c.abs() + h * s.abs() - 1e-6).ceil().max(1.0);
        let out_h = (w * s.abs() + h * c.abs() - 1e-6).ceil().max(1.0);

        let transform = Affine::translate((out_w * 0.5, out_h * 0.5))
            * Affine::rotate(theta)
            * Affine::translate((-w * 0.5, -h * 0.5));

        let out_w16 = to_u16(out_w as u32, "rotated width")?;
        let out_h16 = to_u16(out_h as u32, "rotated height")?;
        let src = self.to_pixmap()?;

        let mut ctx = vello_cpu::RenderContext::new(out_w16, out_h16);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(src)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        ctx.flush();

        let mut out = vello_cpu::Pixmap::new(out_w16, out_h16);
        ctx.render_to_pixmap(&mut out);
        Self::new(
            u32::from(out_w16),
            u32::from(out_h16),
            out.data_as_u8_slice().to_vec(),
        )
    }

    /// Premultiplied bytes viewed as an `image` buffer (for filtering only).
    fn as_image(&self) -> PromoResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.rgba8_premul.to_vec())
            .ok_or_else(|| PromoError::validation("bitmap byte length mismatch"))
    }

    pub(crate) fn to_pixmap(&self) -> PromoResult<vello_cpu::Pixmap> {
        let w = to_u16(self.width, "bitmap width")?;
        let h = to_u16(self.height, "bitmap height")?;

        let mut may_have_opacities = false;
        let mut pixels = Vec::with_capacity(self.width as usize * self.height as usize);
        for px in self.rgba8_premul.chunks_exact(4) {
            let a = px[3];
            may_have_opacities |= a != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a,
            });
        }

        Ok(vello_cpu::Pixmap::from_parts_with_opacity(
            pixels,
            w,
            h,
            may_have_opacities,
        ))
    }
}

pub(crate) fn to_u16(v: u32, what: &str) -> PromoResult<u16> {
    v.try_into()
        .map_err(|_| PromoError::validation(format!("{what} {v} exceeds u16")))
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/bitmap.rs"]
mod tests;
