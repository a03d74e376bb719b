//! Alpha compositing
//!
//! MTX V1 stores an image as an opaque JPEG color plane plus a raw 8-bit
//! alpha plane. [`composite`] merges the two back into RGBA; [`split`] is the
//! inverse used when baking.

use image::{DynamicImage, GenericImageView, RgbaImage};

use crate::error::{Error, Result};

/// Merge a decoded color image with a row-major alpha plane.
///
/// # Errors
/// Returns [`Error::DimensionMismatch`] if the color image is not
/// `width`x`height`, and [`Error::AlphaSizeMismatch`] if the plane does not
/// hold exactly `width * height` bytes.
pub fn composite(color: &DynamicImage, alpha: &[u8], width: u32, height: u32) -> Result<RgbaImage> {
    let (color_width, color_height) = color.dimensions();
    if (color_width, color_height) != (width, height) {
        return Err(Error::DimensionMismatch {
            color_width,
            color_height,
            mask_width: width,
            mask_height: height,
        });
    }

    let expected = width as usize * height as usize;
    if alpha.len() != expected {
        return Err(Error::AlphaSizeMismatch {
            expected,
            actual: alpha.len(),
        });
    }

    let mut rgba = color.to_rgba8();
    for (pixel, &a) in rgba.pixels_mut().zip(alpha) {
        pixel[3] = a;
    }

    Ok(rgba)
}

/// Copy the alpha channel out into a raw plane
pub fn alpha_plane(image: &RgbaImage) -> Vec<u8> {
    image.pixels().map(|p| p[3]).collect()
}

/// Force every pixel fully opaque
pub fn make_opaque(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        pixel[3] = 0xFF;
    }
}

/// Split an RGBA image into an opaque color image and its alpha plane.
///
/// The alpha is taken out first, then the image is made opaque in place so
/// the lossy encoder never sees transparent pixels.
pub fn split(mut image: RgbaImage) -> (RgbaImage, Vec<u8>) {
    let alpha = alpha_plane(&image);
    make_opaque(&mut image);
    (image, alpha)
}
