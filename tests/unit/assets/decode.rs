use super::*;
use crate::foundation::error::ErrorKind;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[test]
fn decodes_png_bytes() {
    let src = ImageSource::Bytes(png_bytes(3, 2, [10, 20, 30, 255]));
    let decoded = decode_image(&src).unwrap();
    assert_eq!((decoded.width, decoded.height), (3, 2));
    assert_eq!(decoded.rgba8.len(), 3 * 2 * 4);
    assert_eq!(&decoded.rgba8[..4], &[10, 20, 30, 255]);
}

#[test]
fn garbage_bytes_fail_with_image_load() {
    let src = ImageSource::Bytes(vec![0xde, 0xad, 0xbe, 0xef]);
    let err = decode_image(&src).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ImageLoad);
}

#[test]
fn missing_path_fails_with_image_load() {
    let src = ImageSource::Path("does/not/exist.png".into());
    let err = decode_image(&src).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ImageLoad);
    assert!(err.to_string().contains("does/not/exist.png"));
}
