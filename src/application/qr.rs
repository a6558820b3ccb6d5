//! QR encoding of contact records.
//!
//! Symbol construction is delegated to the `qrcode` crate; this module only
//! rasterizes the module matrix (black on white, one-module margin) and wraps
//! it as a PNG data URL.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{GrayImage, Luma};
use qrcode::{Color, EcLevel, QrCode};

use crate::domain::{AppError, Result};

/// Pixels per QR module in the bitmap.
pub const MODULE_PX: u32 = 4;

/// Quiet zone around the symbol, in modules.
pub const MARGIN_MODULES: u32 = 1;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// A rendered QR symbol.
#[derive(Debug, Clone)]
pub struct QrImage {
    /// Square grayscale bitmap.
    pub bitmap: GrayImage,
    /// The bitmap as `data:image/png;base64,...`.
    pub data_url: String,
}

/// Encode `text` as a QR symbol.
///
/// # Errors
/// Returns `Qr` when the text does not fit in any QR version.
pub fn encode_qr(text: &str) -> Result<QrImage> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::M)
        .map_err(|e| AppError::Qr {
            message: e.to_string(),
        })?;

    let bitmap = rasterize(code.width(), &code.to_colors());
    let data_url = png_data_url(&bitmap)?;

    tracing::debug!(
        modules = code.width(),
        side_px = bitmap.width(),
        "Encoded contact QR"
    );

    Ok(QrImage { bitmap, data_url })
}

/// Paint a `width`×`width` module matrix with margin.
fn rasterize(width: usize, colors: &[Color]) -> GrayImage {
    let modules = width as u32;
    let side = (modules + 2 * MARGIN_MODULES) * MODULE_PX;
    let mut bitmap = GrayImage::from_pixel(side, side, LIGHT);

    for (i, color) in colors.iter().enumerate() {
        if !matches!(color, Color::Dark) {
            continue;
        }
        let mx = (i % width) as u32 + MARGIN_MODULES;
        let my = (i / width) as u32 + MARGIN_MODULES;
        for dy in 0..MODULE_PX {
            for dx in 0..MODULE_PX {
                bitmap.put_pixel(mx * MODULE_PX + dx, my * MODULE_PX + dy, DARK);
            }
        }
    }

    bitmap
}

fn png_data_url(bitmap: &GrayImage) -> Result<String> {
    let mut png = Vec::new();
    bitmap
        .write_with_encoder(PngEncoder::new(&mut png))
        .map_err(|e| AppError::render(format!("Failed to encode QR bitmap: {e}")))?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::vcard::encode_vcard;
    use crate::domain::CardData;

    #[test]
    fn test_qr_bitmap_geometry() {
        let qr = encode_qr("BEGIN:VCARD\r\nEND:VCARD\r\n").unwrap();
        let side = qr.bitmap.width();

        assert_eq!(side, qr.bitmap.height());
        assert_eq!(side % MODULE_PX, 0);
        // Margin is white, the finder pattern corner right inside it is black.
        assert_eq!(qr.bitmap.get_pixel(0, 0), &LIGHT);
        let inset = MARGIN_MODULES * MODULE_PX;
        assert_eq!(qr.bitmap.get_pixel(inset, inset), &DARK);
    }

    #[test]
    fn test_qr_data_url_is_png() {
        let qr = encode_qr(&encode_vcard(&CardData::sample())).unwrap();
        assert!(qr.data_url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_qr_is_deterministic() {
        let record = encode_vcard(&CardData::sample());
        assert_eq!(
            encode_qr(&record).unwrap().data_url,
            encode_qr(&record).unwrap().data_url
        );
    }

    #[test]
    fn test_overlong_input_is_rejected() {
        let huge = "x".repeat(8000);
        assert!(matches!(encode_qr(&huge), Err(AppError::Qr { .. })));
    }
}
