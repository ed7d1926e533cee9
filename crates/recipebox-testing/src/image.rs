//! Encoded sample images for upload tests.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

fn encode(format: ImageFormat, width: u32, height: u32) -> Bytes {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 80, 40])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    Bytes::from(buf.into_inner())
}

/// A solid-colour PNG of the given size.
pub fn png(width: u32, height: u32) -> Bytes {
    encode(ImageFormat::Png, width, height)
}

/// A solid-colour JPEG of the given size.
pub fn jpeg(width: u32, height: u32) -> Bytes {
    encode(ImageFormat::Jpeg, width, height)
}

/// Bytes that no image decoder accepts.
pub fn not_an_image() -> Bytes {
    Bytes::from_static(b"notimage")
}
