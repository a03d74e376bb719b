//! V1: blocks of color chunk + zlib alpha chunk

use std::io::{Read, Seek};

use tracing::debug;

use super::ExtractPlan;
use crate::compression::decompress_alpha;
use crate::container::types::ExtractWarning;
use crate::converter::{
    composite, decode_color, encode_png, make_opaque, probe_dimensions, sniff_color_format,
};
use crate::error::{Error, Result};
use crate::formats::mtx::{
    BLOCK_HEADER_V1_SIZE, BlockHeaderV1, ChunkReader, ContainerVersion, HEADER_V0V1_SIZE,
    HeaderV0V1, check_image_bounds,
};

pub(super) fn extract<R: Read + Seek>(reader: &mut ChunkReader<R>) -> Result<ExtractPlan> {
    let header: HeaderV0V1 = reader.read_header()?;
    let declared = header.total_length();
    let actual = reader.len() - HEADER_V0V1_SIZE as u64;
    if declared != actual {
        return Err(Error::DeclaredSizeMismatch { declared, actual });
    }
    debug!(
        "V1 header: first block {} bytes, second block {} bytes",
        header.length_first, header.length_second
    );

    let mut plan = ExtractPlan::new(ContainerVersion::V1);
    let mut index = 0;

    while !reader.is_eof() {
        if reader.remaining() < BLOCK_HEADER_V1_SIZE as u64 {
            plan.check_trailing(reader);
            break;
        }

        index += 1;
        let start = reader.position();
        let (dimensions, png) = read_block(reader, index)?;
        let consumed = reader.position() - start;

        if index == 1 && consumed != u64::from(header.length_first) {
            return Err(Error::BlockLengthMismatch {
                index,
                declared: u64::from(header.length_first),
                actual: consumed,
            });
        }

        plan.push(index, Some(dimensions), png);
    }

    if index > 2 {
        plan.warn(ExtractWarning::ExtraBlocks { count: index });
    }

    Ok(plan)
}

/// Read one block and return its dimensions and the composited PNG
fn read_block<R: Read + Seek>(reader: &mut ChunkReader<R>, index: usize) -> Result<((u32, u32), Vec<u8>)> {
    let block: BlockHeaderV1 = reader.read_header()?;
    check_image_bounds(block.width, block.height)?;
    debug!(
        "Block {index}: {}x{} at offset {}",
        block.width,
        block.height,
        reader.position() - BLOCK_HEADER_V1_SIZE as u64
    );

    let color = reader.read_chunk("color chunk length")?;
    let format = sniff_color_format(&color)?;
    let (width, height) = probe_dimensions(&color, format)?;
    check_image_bounds(width, height)?;
    if (width, height) != (block.width, block.height) {
        return Err(Error::DimensionMismatch {
            color_width: width,
            color_height: height,
            mask_width: block.width,
            mask_height: block.height,
        });
    }
    debug!("Block {index}: {format:?} color chunk, {} bytes", color.len());
    let decoded = decode_color(&color, format)?;

    let alpha_chunk = reader.read_chunk("alpha chunk length")?;
    let rgba = if alpha_chunk.is_empty() {
        debug!("Block {index}: no alpha chunk");
        let mut rgba = decoded.to_rgba8();
        make_opaque(&mut rgba);
        rgba
    } else {
        let alpha = decompress_alpha(&alpha_chunk, block.pixel_count())?;
        composite(&decoded, &alpha, width, height)?
    };

    Ok(((width, height), encode_png(&rgba)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::compress_alpha;
    use crate::converter::{ColorFormat, encode_jpeg};
    use crate::error::ErrorKind;
    use crate::formats::mtx::{BinaryHeader, ChunkWriter};
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn block(width: u32, height: u32, declared: (u32, u32), alpha: Option<&[u8]>) -> Vec<u8> {
        let color = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 90]));
        let jpeg = encode_jpeg(&color, 90).unwrap();
        let alpha = alpha.map(|a| compress_alpha(a).unwrap()).unwrap_or_default();

        let mut writer = ChunkWriter::new(Vec::new());
        writer.write_header(&BlockHeaderV1::new(declared.0, declared.1)).unwrap();
        writer.write_chunk(&jpeg).unwrap();
        writer.write_chunk(&alpha).unwrap();
        writer.finish().unwrap()
    }

    fn container(blocks: &[Vec<u8>], trailing: &[u8]) -> Vec<u8> {
        let first = blocks.first().map_or(0, Vec::len) as u32;
        let rest = blocks.iter().skip(1).map(Vec::len).sum::<usize>() + trailing.len();
        let mut data = HeaderV0V1::new(ContainerVersion::V1, first, rest as u32)
            .to_bytes()
            .unwrap();
        for block in blocks {
            data.extend_from_slice(block);
        }
        data.extend_from_slice(trailing);
        data
    }

    fn decode(png: &[u8]) -> RgbaImage {
        decode_color(png, ColorFormat::Png).unwrap().to_rgba8()
    }

    #[test]
    fn test_two_blocks_with_alpha() {
        let alpha_small: Vec<u8> = (0..8 * 4).map(|i| (i * 8) as u8).collect();
        let alpha_full: Vec<u8> = (0..16 * 8).map(|i| (i * 2) as u8).collect();
        let data = container(
            &[block(8, 4, (8, 4), Some(&alpha_small)), block(16, 8, (16, 8), Some(&alpha_full))],
            &[],
        );

        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        let plan = extract(&mut reader).unwrap();

        assert_eq!(plan.outputs.len(), 2);
        assert_eq!(plan.outputs[0].dimensions, Some((8, 4)));
        let full = decode(&plan.outputs[1].data);
        assert_eq!(full.dimensions(), (16, 8));
        let recovered: Vec<u8> = full.pixels().map(|p| p[3]).collect();
        assert_eq!(recovered, alpha_full);
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_missing_alpha_is_opaque() {
        let data = container(&[block(4, 4, (4, 4), None)], &[]);
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        let plan = extract(&mut reader).unwrap();
        assert!(decode(&plan.outputs[0].data).pixels().all(|p: &Rgba<u8>| p[3] == 0xFF));
    }

    #[test]
    fn test_declared_size_mismatch() {
        let mut data = container(&[block(4, 4, (4, 4), None)], &[]);
        data.push(0);
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        let err = extract(&mut reader).unwrap_err();
        assert!(matches!(err, Error::DeclaredSizeMismatch { .. }));
        assert_eq!(err.kind(), ErrorKind::SizeMismatch);
    }

    #[test]
    fn test_first_block_length_mismatch() {
        let first = block(4, 4, (4, 4), None);
        let second = block(2, 2, (2, 2), None);
        let total = (first.len() + second.len()) as u32;
        let mut data = HeaderV0V1::new(ContainerVersion::V1, first.len() as u32 - 1, 1)
            .to_bytes()
            .unwrap();
        data.extend_from_slice(&first);
        data.extend_from_slice(&second);
        data[8..12].copy_from_slice(&(total - (first.len() as u32 - 1)).to_le_bytes());

        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        let err = extract(&mut reader).unwrap_err();
        assert!(matches!(err, Error::BlockLengthMismatch { index: 1, .. }));
    }

    #[test]
    fn test_header_dimensions_disagree() {
        let data = container(&[block(4, 4, (4, 5), None)], &[]);
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        let err = extract(&mut reader).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { mask_height: 5, .. }));
    }

    #[test]
    fn test_oversized_block_header() {
        let data = container(&[block(4, 4, (4097, 4), None)], &[]);
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        let err = extract(&mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OversizedImage);
    }

    #[test]
    fn test_wrong_alpha_length() {
        let data = container(&[block(4, 4, (4, 4), Some(&[0u8; 15]))], &[]);
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        let err = extract(&mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeMismatch);
    }

    #[test]
    fn test_extra_blocks_and_trailing() {
        let blocks = [
            block(4, 4, (4, 4), None),
            block(8, 8, (8, 8), None),
            block(2, 2, (2, 2), None),
        ];
        let data = container(&blocks, &[0xAA; 3]);
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        let plan = extract(&mut reader).unwrap();

        assert_eq!(plan.outputs.len(), 3);
        assert!(plan.warnings.contains(&ExtractWarning::ExtraBlocks { count: 3 }));
        assert!(
            plan.warnings
                .iter()
                .any(|w| matches!(w, ExtractWarning::TrailingData { len: 3, .. }))
        );
    }
}
