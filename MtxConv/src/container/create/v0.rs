//! V0 encoder: half-size JPEG then full-size JPEG

use tracing::debug;

use super::decode_bounded_input;
use crate::container::types::EncodedContainer;
use crate::converter::{encode_jpeg, half_size};
use crate::error::{Error, Result};
use crate::formats::mtx::{ChunkWriter, ContainerVersion, HeaderV0V1};

pub(super) fn encode(data: &[u8], quality: u8) -> Result<EncodedContainer> {
    let image = decode_bounded_input(data)?;

    let original = image.to_rgb8();
    let scaled = half_size(&original);

    let original_jpeg = encode_jpeg(&original, quality)?;
    let scaled_jpeg = encode_jpeg(&scaled, quality)?;
    debug!(
        "V0: scaled {}x{} ({} bytes), original {}x{} ({} bytes)",
        scaled.width(),
        scaled.height(),
        scaled_jpeg.len(),
        original.width(),
        original.height(),
        original_jpeg.len()
    );

    let header = HeaderV0V1::new(
        ContainerVersion::V0,
        stream_len(&scaled_jpeg)?,
        stream_len(&original_jpeg)?,
    );

    let mut writer = ChunkWriter::new(Vec::new());
    writer.write_header(&header)?;
    writer.write_raw(&scaled_jpeg)?;
    writer.write_raw(&original_jpeg)?;

    Ok(EncodedContainer {
        version: ContainerVersion::V0,
        bytes: writer.finish()?,
        images: vec![scaled.dimensions(), original.dimensions()],
    })
}

fn stream_len(data: &[u8]) -> Result<u32> {
    u32::try_from(data.len()).map_err(|_| Error::ChunkTooLarge { len: data.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{ColorFormat, encode_png, probe_dimensions, sniff_color_format};
    use crate::formats::mtx::{BinaryHeader, HEADER_V0V1_SIZE};
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_layout() {
        let source = RgbaImage::from_fn(20, 10, |x, y| Rgba([x as u8 * 10, y as u8 * 20, 0, 255]));
        let encoded = encode(&encode_png(&source).unwrap(), 90).unwrap();
        assert_eq!(encoded.images, vec![(10, 5), (20, 10)]);

        let bytes = &encoded.bytes;
        let header = HeaderV0V1::parse(bytes).unwrap();
        assert_eq!(header.magic, 0);
        assert_eq!(bytes.len() as u64, HEADER_V0V1_SIZE as u64 + header.total_length());

        let first_end = HEADER_V0V1_SIZE + header.length_first as usize;
        let scaled = &bytes[HEADER_V0V1_SIZE..first_end];
        let original = &bytes[first_end..];
        assert_eq!(sniff_color_format(scaled).unwrap(), ColorFormat::Jpeg);
        assert_eq!(probe_dimensions(scaled, ColorFormat::Jpeg).unwrap(), (10, 5));
        assert_eq!(probe_dimensions(original, ColorFormat::Jpeg).unwrap(), (20, 10));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(encode(b"definitely not an image", 90).is_err());
    }
}
