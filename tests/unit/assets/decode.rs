use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50, 200, 128]).unwrap();
    let bmp = decode_image(&png_bytes(img)).unwrap();
    assert_eq!((bmp.width, bmp.height), (1, 1));
    assert_eq!(
        bmp.pixel(0, 0),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}

#[test]
fn open_dispatches_by_extension() {
    let dir = tempfile::tempdir().unwrap();

    let png = dir.path().join("logo.PNG");
    std::fs::write(&png, png_bytes(image::RgbaImage::new(4, 2))).unwrap();
    let img = SourceImage::open(&png).unwrap();
    assert!(matches!(img, SourceImage::Raster(_)));
    assert_eq!(img.size(), (4, 2));

    let svg = dir.path().join("badge.svg");
    std::fs::write(
        &svg,
        br##"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="4"><rect width="8" height="4" fill="#ff0000"/></svg>"##,
    )
    .unwrap();
    let img = SourceImage::open(&svg).unwrap();
    assert_eq!(img.size(), (8, 4));
    let bmp = img.to_bitmap(16, 8).unwrap();
    assert_eq!((bmp.width, bmp.height), (16, 8));
    assert_eq!(bmp.pixel(8, 4), [255, 0, 0, 255]);
}

#[test]
fn open_reports_missing_unsupported_and_corrupt() {
    let dir = tempfile::tempdir().unwrap();

    let missing = SourceImage::open(&dir.path().join("nope.png")).unwrap_err();
    assert!(matches!(missing, PromoError::SourceNotFound(_)));

    let txt = dir.path().join("notes.txt");
    std::fs::write(&txt, b"hello").unwrap();
    assert!(matches!(
        SourceImage::open(&txt).unwrap_err(),
        PromoError::UnsupportedFormat(_)
    ));

    let bad = dir.path().join("broken.png");
    std::fs::write(&bad, b"not a png").unwrap();
    assert!(matches!(
        SourceImage::open(&bad).unwrap_err(),
        PromoError::CorruptSource(_)
    ));
}

#[test]
fn parse_svg_rejects_garbage() {
    assert!(parse_svg(br#"<svg"#).is_err());
}
