//! JPEG/PNG color plane encoding and decoding

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, ImageFormat, ImageReader, Pixel, RgbImage, RgbaImage};
use serde::Serialize;

use crate::error::{Error, Result};

/// Formats a color chunk may be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorFormat {
    Jpeg,
    Png,
}

impl ColorFormat {
    fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }
}

/// Detect whether a color stream is JPEG or PNG from its magic bytes
///
/// # Errors
/// Returns [`Error::UnrecognizedImageFormat`] for anything else.
pub fn sniff_color_format(data: &[u8]) -> Result<ColorFormat> {
    match image::guess_format(data) {
        Ok(ImageFormat::Jpeg) => Ok(ColorFormat::Jpeg),
        Ok(ImageFormat::Png) => Ok(ColorFormat::Png),
        Ok(other) => Err(Error::UnrecognizedImageFormat {
            detail: format!("{other:?}"),
        }),
        Err(e) => Err(Error::UnrecognizedImageFormat {
            detail: e.to_string(),
        }),
    }
}

/// Read the dimensions of a color stream without decoding its pixels
///
/// # Errors
/// Returns [`Error::ImageDecodeFailed`] if the stream header is invalid.
pub fn probe_dimensions(data: &[u8], format: ColorFormat) -> Result<(u32, u32)> {
    Ok(ImageReader::with_format(Cursor::new(data), format.image_format()).into_dimensions()?)
}

/// Decode a color stream of a known format
///
/// # Errors
/// Returns [`Error::ImageDecodeFailed`] if decoding fails.
pub fn decode_color(data: &[u8], format: ColorFormat) -> Result<DynamicImage> {
    Ok(image::load_from_memory_with_format(data, format.image_format())?)
}

/// Read the dimensions of a user-supplied input file, guessing its format
///
/// # Errors
/// Returns [`Error::ImageDecodeFailed`] if the header cannot be read.
pub fn probe_input_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    Ok(ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .into_dimensions()?)
}

/// Decode a user-supplied input file, guessing its format from content
///
/// # Errors
/// Returns [`Error::ImageDecodeFailed`] if decoding fails.
pub fn decode_input(data: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(data)?)
}

/// Encode an RGB image as JPEG
///
/// # Errors
/// Returns [`Error::ImageEncodeFailed`] if encoding fails.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);
    image
        .write_with_encoder(encoder)
        .map_err(|e| Error::ImageEncodeFailed {
            format: "JPEG",
            message: e.to_string(),
        })?;
    Ok(out)
}

/// Encode an RGBA image as PNG, favouring speed over size
///
/// # Errors
/// Returns [`Error::ImageEncodeFailed`] if encoding fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut out, CompressionType::Fast, PngFilter::Adaptive);
    image
        .write_with_encoder(encoder)
        .map_err(|e| Error::ImageEncodeFailed {
            format: "PNG",
            message: e.to_string(),
        })?;
    Ok(out)
}

/// Half of each axis, never below one pixel
#[must_use]
pub fn half_dimensions(width: u32, height: u32) -> (u32, u32) {
    ((width / 2).max(1), (height / 2).max(1))
}

/// Catmull-Rom resample to [`half_dimensions`]
pub fn half_size<P>(image: &ImageBuffer<P, Vec<u8>>) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let (width, height) = half_dimensions(image.width(), image.height());
    imageops::resize(image, width, height, FilterType::CatmullRom)
}
