// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Codec glue — decoding uploads into RGB, downscaling them to the preview
// box, and encoding results as PNG. The heavy lifting is done by `image`.

use std::path::Path;

use bildwerk_core::error::{BildwerkError, Result};
use image::{DynamicImage, ImageFormat, RgbImage};
use tracing::{debug, info, instrument};

use crate::raster::Raster;

/// Dimensions after fitting `width` x `height` inside `max_width` x
/// `max_height`. Never upscales; each side stays at least 1.
pub fn fitted_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    let scale = (f64::from(max_width) / f64::from(width))
        .min(f64::from(max_height) / f64::from(height))
        .min(1.0);
    let fit = |side: u32| ((f64::from(side) * scale) as u32).max(1);
    (fit(width), fit(height))
}

/// Downscale `image` to fit the bounding box with Lanczos3, preserving the
/// aspect ratio. Images already inside the box are returned untouched.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn fit_within(image: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    let (new_w, new_h) = fitted_dimensions(width, height, max_width, max_height);
    if (new_w, new_h) == (width, height) {
        debug!("Image already fits preview box");
        return image;
    }
    info!(new_w, new_h, max_width, max_height, "Downscaling image");
    image.resize_exact(new_w, new_h, image::imageops::FilterType::Lanczos3)
}

/// Decode encoded bytes (JPEG, PNG, ...) into an 8-bit RGB image.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode_rgb(data: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(data)
        .map_err(|err| BildwerkError::Image(format!("failed to decode image: {}", err)))?;
    debug!(width = img.width(), height = img.height(), "Image decoded from bytes");
    Ok(img.to_rgb8())
}

/// Open an image file and convert it to RGB.
pub fn open_rgb(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| {
        BildwerkError::Image(format!("failed to open {}: {}", path.display(), err))
    })?;
    info!(width = img.width(), height = img.height(), "Image loaded");
    Ok(DynamicImage::ImageRgb8(img.to_rgb8()))
}

/// Quantize `raster` and encode it as PNG bytes.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    raster
        .to_rgb_image()
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| BildwerkError::Image(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}
