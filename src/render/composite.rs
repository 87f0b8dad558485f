use crate::foundation::error::{PromoError, PromoResult};
use crate::foundation::math::mul_div255_u8;
use crate::render::bitmap::Bitmap;

pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Composite `src` over `dst` with its top-left corner at `(x, y)`.
///
/// `dst` is a tightly packed `dst_width x dst_height` premultiplied buffer. Any part of `src` that
/// falls outside the destination (negative offsets included) is clipped.
pub fn over_at(
    dst: &mut [u8],
    dst_width: u32,
    dst_height: u32,
    src: &Bitmap,
    x: i64,
    y: i64,
) -> PromoResult<()> {
    if dst.len() != dst_width as usize * dst_height as usize * 4 {
        return Err(PromoError::validation(
            "over_at expects a dst buffer of width*height*4 bytes",
        ));
    }

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(src.width)).min(i64::from(dst_width));
    let y1 = (y + i64::from(src.height)).min(i64::from(dst_height));
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let src_stride = src.width as usize * 4;
    let dst_stride = dst_width as usize * 4;
    let span = (x1 - x0) as usize * 4;
    let src_data = src.rgba8_premul.as_slice();

    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        let sx = (x0 - x) as usize;
        let s_off = sy * src_stride + sx * 4;
        let d_off = dy as usize * dst_stride + x0 as usize * 4;

        let s_row = &src_data[s_off..s_off + span];
        let d_row = &mut dst[d_off..d_off + span];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
