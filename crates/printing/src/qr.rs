//! Scannable identifier image for a packing-list code.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};

use crate::error::PrintError;

/// Smallest rendered edge, in pixels.
pub const QR_MIN_DIMENSION: u32 = 128;

/// PNG QR image embedded as a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    pub data_uri: String,
    pub width: u32,
}

/// Encode `code` as a QR symbol (error correction M) rendered to PNG.
pub fn encode_identifier(code: &str) -> Result<QrImage, PrintError> {
    let symbol = QrCode::with_error_correction_level(code.as_bytes(), EcLevel::M)
        .map_err(|e| PrintError::Encoding(e.to_string()))?;

    let pixels = symbol
        .render::<Luma<u8>>()
        .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
        .build();
    let width = pixels.width();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(pixels)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| PrintError::Encoding(e.to_string()))?;

    Ok(QrImage {
        data_uri: format!("data:image/png;base64,{}", STANDARD.encode(&png)),
        width,
    })
}
