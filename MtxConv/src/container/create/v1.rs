//! V1 encoder: one block per image, half-size block first

use image::{DynamicImage, RgbaImage};
use tracing::debug;

use super::decode_bounded_input;
use crate::compression::compress_alpha;
use crate::container::types::EncodedContainer;
use crate::converter::{encode_jpeg, half_size, split};
use crate::error::{Error, Result};
use crate::formats::mtx::{BLOCK_OVERHEAD_V1, BlockHeaderV1, ChunkWriter, ContainerVersion, HeaderV0V1};

/// Color and alpha chunks of one block, encoded
struct EncodedBlock {
    width: u32,
    height: u32,
    color: Vec<u8>,
    alpha: Vec<u8>,
}

impl EncodedBlock {
    fn new(image: RgbaImage, quality: u8) -> Result<Self> {
        let (width, height) = image.dimensions();
        let (opaque, alpha) = split(image);
        let color = encode_jpeg(&DynamicImage::ImageRgba8(opaque).into_rgb8(), quality)?;
        let alpha = compress_alpha(&alpha)?;
        debug!(
            "V1 block {width}x{height}: color {} bytes, alpha {} bytes",
            color.len(),
            alpha.len()
        );
        Ok(Self {
            width,
            height,
            color,
            alpha,
        })
    }

    /// Block size including header and both length prefixes
    fn total_len(&self) -> Result<u32> {
        let total = BLOCK_OVERHEAD_V1 + self.color.len() as u64 + self.alpha.len() as u64;
        u32::try_from(total).map_err(|_| Error::ChunkTooLarge {
            len: usize::try_from(total).unwrap_or(usize::MAX),
        })
    }

    fn write_to(&self, writer: &mut ChunkWriter<Vec<u8>>) -> Result<()> {
        writer.write_header(&BlockHeaderV1::new(self.width, self.height))?;
        writer.write_chunk(&self.color)?;
        writer.write_chunk(&self.alpha)
    }
}

pub(super) fn encode(data: &[u8], quality: u8) -> Result<EncodedContainer> {
    let original = decode_bounded_input(data)?.to_rgba8();
    let scaled = half_size(&original);

    let blocks = [EncodedBlock::new(scaled, quality)?, EncodedBlock::new(original, quality)?];
    let header = HeaderV0V1::new(
        ContainerVersion::V1,
        blocks[0].total_len()?,
        blocks[1].total_len()?,
    );

    let mut writer = ChunkWriter::new(Vec::new());
    writer.write_header(&header)?;
    for block in &blocks {
        block.write_to(&mut writer)?;
    }

    Ok(EncodedContainer {
        version: ContainerVersion::V1,
        bytes: writer.finish()?,
        images: blocks.iter().map(|b| (b.width, b.height)).collect(),
    })
}
