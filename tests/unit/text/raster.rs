use super::*;
use crate::assets::fonts::fixture_font;
use crate::foundation::core::Rgba8;

fn rasterizer() -> TextRasterizer {
    TextRasterizer::new(&[PathBuf::from("/nonexistent/font.ttf"), fixture_font()], 3).unwrap()
}

fn ink(bmp: &Bitmap) -> (u32, u32, u32, u32) {
    bmp.opaque_bounds().expect("glyph pixels")
}

#[test]
fn padded_extent_adds_padding_and_stroke_on_all_sides() {
    let e = padded_extent(100.0, 50.0, 90.0, 6);
    assert_eq!(e.pad, 27 + 6);
    assert_eq!(e.width, 100 + 2 * 33);
    assert_eq!(e.height, 50 + 2 * 33);
}

#[test]
fn zero_scale_is_rejected() {
    assert!(matches!(
        TextRasterizer::new(&[], 0).err(),
        Some(PromoError::Validation(_))
    ));
}

#[test]
fn missing_fonts_fail_hard() {
    let err = TextRasterizer::new(&[PathBuf::from("/nonexistent/a.ttf")], 3)
        .err()
        .unwrap();
    assert!(matches!(err, PromoError::FontUnavailable(_)));
}

#[test]
fn resolves_the_first_loadable_candidate() {
    let r = rasterizer();
    assert_eq!(r.font_path(), fixture_font());
    assert_eq!(r.scale(), 3);
}

#[test]
fn glyphs_stay_inside_the_padding() {
    let mut r = rasterizer();
    let bmp = r.rasterize("Hg", &TextStyle::sized(40.0)).unwrap();
    let (x0, y0, x1, y1) = ink(&bmp);
    assert!(x0 > 0 && y0 > 0, "ink touches the top-left edge: {x0},{y0}");
    assert!(x1 < bmp.width && y1 < bmp.height);
    // Cap height of a 40 px font is far more than a sliver below the baseline.
    assert!(y1 - y0 > 20, "ink height {}", y1 - y0);
}

#[test]
fn glyphs_advance_along_the_line() {
    let mut r = rasterizer();
    let style = TextStyle::sized(40.0);
    let one = r.rasterize("I", &style).unwrap();
    let eight = r.rasterize("IIIIIIII", &style).unwrap();
    let (a0, _, a1, _) = ink(&one);
    let (b0, _, b1, _) = ink(&eight);
    assert!(
        b1 - b0 > 4 * (a1 - a0),
        "8 glyphs span {} px, 1 glyph spans {} px",
        b1 - b0,
        a1 - a0
    );
    assert!(eight.width > one.width);
}

#[test]
fn second_line_sits_below_the_first() {
    let mut r = rasterizer();
    let style = TextStyle::sized(30.0);
    let single = r.rasterize("Ab", &style).unwrap();
    let double = r.rasterize("Ab\nAb", &style).unwrap();
    let (_, s0, _, s1) = ink(&single);
    let (_, d0, _, d1) = ink(&double);
    assert!(d1 - d0 > 2 * (s1 - s0) - 4);
    assert!(d0 > 0 && d1 < double.height);
}

#[test]
fn stroke_grows_the_bitmap_and_the_ink() {
    let mut r = rasterizer();
    let plain = r.rasterize("AB", &TextStyle::sized(30.0)).unwrap();
    let stroked = r
        .rasterize("AB", &TextStyle::sized(30.0).with_stroke(Rgba8::BLACK, 2))
        .unwrap();
    assert_eq!(stroked.width, plain.width + 4);
    assert_eq!(stroked.height, plain.height + 4);

    let (p0, _, p1, _) = ink(&plain);
    let (s0, t0, s1, _) = ink(&stroked);
    assert!(s1 - s0 > p1 - p0);
    assert!(s0 > 0 && t0 > 0);
}

#[test]
fn fill_color_reaches_the_glyph_interior() {
    let mut r = rasterizer();
    let red = Rgba8::opaque(255, 0, 0);
    let bmp = r
        .rasterize("H", &TextStyle::sized(60.0).with_color(red))
        .unwrap();
    let opaque_red = (0..bmp.height)
        .flat_map(|y| (0..bmp.width).map(move |x| (x, y)))
        .filter(|&(x, y)| {
            let [r, g, b, a] = bmp.pixel(x, y);
            a > 240 && r > 200 && g < 40 && b < 40
        })
        .count();
    assert!(opaque_red > 50, "only {opaque_red} solid red pixels");
}

#[test]
fn rotation_expands_canvas() {
    let mut r = rasterizer();
    let upright = r.rasterize("WIDE TEXT", &TextStyle::sized(24.0)).unwrap();
    let turned = r
        .rasterize("WIDE TEXT", &TextStyle::sized(24.0).with_rotation(90.0))
        .unwrap();
    assert_eq!((turned.width, turned.height), (upright.height, upright.width));
}

#[test]
fn empty_text_is_rejected() {
    let mut r = rasterizer();
    assert!(matches!(
        r.rasterize("", &TextStyle::default()).unwrap_err(),
        PromoError::Validation(_)
    ));
}

#[test]
fn characters_outside_the_primary_font_still_render() {
    // The primary font is Latin only; CJK comes from whatever fallback run parley picks.
    let mut r = rasterizer();
    let latin = r.rasterize("Hi", &TextStyle::sized(40.0)).unwrap();
    let mixed = r.rasterize("Hi测试", &TextStyle::sized(40.0)).unwrap();
    assert!(mixed.width > latin.width);
    let (x0, y0, _, _) = ink(&mixed);
    assert!(x0 > 0 && y0 > 0);
}
