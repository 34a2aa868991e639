//! QR code bitmap generation.

use image::{ImageBuffer, Rgb};
use qrcode::{Color as QrColor, QrCode};

use crate::core::error::{RenderError, RenderResult};

const SCALE: usize = 5;

/// Render `data` as a PNG-encoded QR bitmap.
///
/// Callers treat a failure here as "no QR on this invoice", never as a
/// reason to fail the document.
pub fn qr_png(data: &str) -> RenderResult<Vec<u8>> {
    let code = QrCode::new(data.as_bytes()).map_err(|e| RenderError::Qr(e.to_string()))?;
    let width = code.width();
    let img_size = (width * SCALE) as u32;

    let mut img = ImageBuffer::<Rgb<u8>, Vec<u8>>::new(img_size, img_size);
    for y in 0..width {
        for x in 0..width {
            let pixel = match code[(x, y)] {
                QrColor::Dark => Rgb([0, 0, 0]),
                QrColor::Light => Rgb([255, 255, 255]),
            };
            for dy in 0..SCALE {
                for dx in 0..SCALE {
                    img.put_pixel((x * SCALE + dx) as u32, (y * SCALE + dy) as u32, pixel);
                }
            }
        }
    }

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut buf),
            image::ImageOutputFormat::Png,
        )
        .map_err(|e| RenderError::Qr(e.to_string()))?;
    Ok(buf)
}
