use super::*;

fn solid(width: u32, height: u32, px: [u8; 4]) -> Bitmap {
    let data = px.repeat(width as usize * height as usize);
    Bitmap::new(width, height, data).unwrap()
}

#[test]
fn new_rejects_mismatched_buffers() {
    assert!(Bitmap::new(2, 2, vec![0u8; 15]).is_err());
    assert!(Bitmap::new(0, 2, vec![]).is_err());
    assert!(Bitmap::new(2, 2, vec![0u8; 16]).is_ok());
}

#[test]
fn straight_images_are_premultiplied() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100, 50, 200, 128]).unwrap();
    let bmp = Bitmap::from_straight_image(img).unwrap();
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
fn lanczos_downsample_keeps_premul_invariant() {
    let mut data = Vec::new();
    for i in 0..(12 * 12) {
        if i % 3 == 0 {
            data.extend_from_slice(&[255, 255, 255, 255]);
        } else {
            data.extend_from_slice(&[0, 0, 0, 0]);
        }
    }
    let bmp = Bitmap::new(12, 12, data).unwrap();
    let small = bmp.resize_lanczos(4, 4).unwrap();
    assert_eq!((small.width, small.height), (4, 4));
    for px in small.rgba8_premul.chunks_exact(4) {
        assert!(px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3]);
    }
}

#[test]
fn sharpen_preserves_dimensions() {
    let bmp = solid(6, 3, [40, 40, 40, 255]);
    let out = bmp.sharpen(1.0, 0).unwrap();
    assert_eq!((out.width, out.height), (6, 3));
}

#[test]
fn rotate_zero_is_identity() {
    let bmp = solid(5, 3, [255, 0, 0, 255]);
    assert_eq!(bmp.rotate_expand(0.0).unwrap(), bmp);
    assert_eq!(bmp.rotate_expand(360.0).unwrap(), bmp);
}

#[test]
fn rotate_quarter_turn_swaps_dimensions() {
    let bmp = solid(10, 4, [255, 255, 255, 255]);
    let rotated = bmp.rotate_expand(90.0).unwrap();
    assert_eq!((rotated.width, rotated.height), (4, 10));
}

#[test]
fn rotate_expands_canvas_for_diagonals() {
    let bmp = solid(10, 10, [255, 255, 255, 255]);
    let rotated = bmp.rotate_expand(45.0).unwrap();
    // 10 * sqrt(2) ~ 14.14
    assert_eq!((rotated.width, rotated.height), (15, 15));
    assert_eq!(rotated.pixel(0, 0)[3], 0);
    assert!(rotated.pixel(7, 7)[3] > 200);
}

#[test]
fn opaque_bounds_finds_painted_region() {
    let mut data = vec![0u8; 5 * 4 * 4];
    let i = (2 * 5 + 1) * 4;
    data[i..i + 4].copy_from_slice(&[9, 9, 9, 255]);
    let bmp = Bitmap::new(5, 4, data).unwrap();
    assert_eq!(bmp.opaque_bounds(), Some((1, 2, 2, 3)));
    assert_eq!(solid(2, 2, [0, 0, 0, 0]).opaque_bounds(), None);
}

#[test]
fn straight_image_undoes_premultiplication() {
    let bmp = Bitmap::new(2, 1, vec![128, 64, 0, 128, 0, 0, 0, 0]).unwrap();
    let img = bmp.to_straight_image().unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [255, 128, 0, 128]);
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0, 0]);
}
