use image::{DynamicImage, Luma};
use qrcode::QrCode;

use crate::error::{RenderError, Result};
use crate::pdf::ImageAsset;

const MIN_SIZE: u32 = 256;

/// Public preview page a certificate's QR code points at.
pub fn preview_url(web_url: &str, reference: &str) -> String {
    format!(
        "{}/public-preview-certif/{}",
        web_url.trim_end_matches('/'),
        reference
    )
}

/// Encodes `payload` as a grayscale QR image.
pub fn encode(payload: &str) -> Result<ImageAsset> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| RenderError::QrEncode(e.to_string()))?;
    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_SIZE, MIN_SIZE)
        .build();
    Ok(ImageAsset::new(payload, DynamicImage::ImageLuma8(image)))
}
