use anyhow::Context;
use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::foundation::core::Rgb8;
use crate::foundation::error::{CardError, CardResult};

/// Decode an encoded raster (format sniffed from the bytes) into opaque RGB8.
pub(crate) fn decode_image(bytes: &[u8]) -> CardResult<RgbImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgb = dyn_img.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(CardError::asset("decoded image has zero area"));
    }
    Ok(rgb)
}

/// Scale uniformly so the image covers `width x height`, then center-crop to exactly that box.
///
/// The crop window is chosen in source pixels and only that window is resampled, so no
/// intermediate buffer is larger than the source or the box.
pub(crate) fn cover_crop(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (iw, ih) = img.dimensions();
    if iw == 0 || ih == 0 {
        return RgbImage::new(width, height);
    }
    let ratio = f64::max(
        f64::from(width) / f64::from(iw),
        f64::from(height) / f64::from(ih),
    );
    let cw = ((f64::from(width) / ratio).round() as u32).clamp(1, iw);
    let ch = ((f64::from(height) / ratio).round() as u32).clamp(1, ih);

    let window = imageops::crop_imm(img, (iw - cw) / 2, (ih - ch) / 2, cw, ch).to_image();
    if (cw, ch) == (width, height) {
        return window;
    }
    imageops::resize(&window, width, height, FilterType::Lanczos3)
}

/// Uniform fill of exactly `width x height`.
pub(crate) fn solid_image(width: u32, height: u32, color: Rgb8) -> RgbImage {
    RgbImage::from_pixel(width, height, image::Rgb(color.to_array()))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
