//! Header-level inspection of containers
//!
//! Walks the same structure extraction does, with the same size and bounds
//! checks, but only sniffs the first bytes of each color stream and never
//! decodes pixels.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use super::types::{ContainerInfo, ImageInfo};
use super::{check_input_file, sniff_version};
use crate::converter::{ColorFormat, sniff_color_format};
use crate::error::{Error, Result};
use crate::formats::mtx::{
    BLOCK_HEADER_V1_SIZE, BlockHeaderV1, ChunkReader, ContainerVersion, FileHeader,
    HEADER_V0V1_SIZE, HeaderV0V1, HeaderV2, PvrHeader, check_image_bounds,
};

/// Bytes read from the start of a color stream to identify its format
const SNIFF_PREFIX_LEN: u64 = 32;

/// Describe an MTX file without extracting it
///
/// # Errors
/// Returns the same structural errors extraction would.
pub fn inspect_file(path: &Path) -> Result<ContainerInfo> {
    check_input_file(path)?;
    let reader = BufReader::new(File::open(path)?);
    inspect_reader(reader, path)
}

/// Describe a container read from any seekable source
///
/// # Errors
/// Returns the same structural errors extraction would.
pub fn inspect_reader<R: Read + Seek>(reader: R, path: &Path) -> Result<ContainerInfo> {
    let mut reader = ChunkReader::new(reader)?;
    let version = sniff_version(&mut reader)?;

    let (header, pvr, images) = match version {
        ContainerVersion::V0 => {
            let (header, images) = inspect_v0(&mut reader)?;
            (FileHeader::V0(header), None, images)
        }
        ContainerVersion::V1 => {
            let (header, images) = inspect_v1(&mut reader)?;
            (FileHeader::V1(header), None, images)
        }
        ContainerVersion::V2 => {
            let (header, pvr, image) = inspect_v2(&mut reader)?;
            (FileHeader::V2(header), Some(pvr), vec![image])
        }
    };

    Ok(ContainerInfo {
        path: path.to_path_buf(),
        file_size: reader.len(),
        header,
        pvr,
        images,
        trailing_bytes: reader.remaining(),
    })
}

fn inspect_v0<R: Read + Seek>(reader: &mut ChunkReader<R>) -> Result<(HeaderV0V1, Vec<ImageInfo>)> {
    let header: HeaderV0V1 = reader.read_header()?;
    let mut images = Vec::new();

    for (index, len) in [(1, header.length_first), (2, header.length_second)] {
        if len == 0 {
            continue;
        }
        let offset = reader.position();
        let color_format = sniff_stream(reader, u64::from(len))?;
        images.push(ImageInfo {
            index,
            offset,
            dimensions: None,
            color_format,
            color_len: u64::from(len),
            alpha_len: None,
        });
    }

    Ok((header, images))
}

fn inspect_v1<R: Read + Seek>(reader: &mut ChunkReader<R>) -> Result<(HeaderV0V1, Vec<ImageInfo>)> {
    let header: HeaderV0V1 = reader.read_header()?;
    let declared = header.total_length();
    let actual = reader.len() - HEADER_V0V1_SIZE as u64;
    if declared != actual {
        return Err(Error::DeclaredSizeMismatch { declared, actual });
    }

    let mut images = Vec::new();
    while reader.remaining() >= BLOCK_HEADER_V1_SIZE as u64 {
        let index = images.len() + 1;
        let offset = reader.position();

        let block: BlockHeaderV1 = reader.read_header()?;
        check_image_bounds(block.width, block.height)?;
        let color_len = u64::from(reader.read_u32("color chunk length")?);
        let color_format = sniff_stream(reader, color_len)?;
        let alpha_len = u64::from(reader.read_u32("alpha chunk length")?);
        reader.skip(alpha_len)?;

        let consumed = reader.position() - offset;
        if index == 1 && consumed != u64::from(header.length_first) {
            return Err(Error::BlockLengthMismatch {
                index,
                declared: u64::from(header.length_first),
                actual: consumed,
            });
        }

        images.push(ImageInfo {
            index,
            offset,
            dimensions: Some((block.width, block.height)),
            color_format,
            color_len,
            alpha_len: Some(alpha_len),
        });
    }

    Ok((header, images))
}

fn inspect_v2<R: Read + Seek>(reader: &mut ChunkReader<R>) -> Result<(HeaderV2, PvrHeader, ImageInfo)> {
    let header: HeaderV2 = reader.read_header()?;
    let offset = reader.position();
    let pvr: PvrHeader = reader.read_header()?;
    if !pvr.has_valid_magic() {
        return Err(Error::InvalidPvrMagic(pvr.magic));
    }
    check_image_bounds(pvr.width, pvr.height)?;

    reader.seek_to(offset)?;
    let declared = pvr.payload_len();
    let available = reader.remaining();
    if declared > available {
        return Err(Error::PayloadOverrun {
            declared,
            available,
        });
    }
    reader.skip(declared)?;

    let image = ImageInfo {
        index: 1,
        offset,
        dimensions: Some((pvr.width, pvr.height)),
        color_format: None,
        color_len: declared,
        alpha_len: None,
    };
    Ok((header, pvr, image))
}

/// Sniff the format of a `len`-byte stream and move past it
fn sniff_stream<R: Read + Seek>(reader: &mut ChunkReader<R>, len: u64) -> Result<Option<ColorFormat>> {
    if len > reader.remaining() {
        return Err(Error::TruncatedChunk {
            offset: reader.position(),
            declared: len,
            available: reader.remaining(),
        });
    }
    let prefix_len = len.min(SNIFF_PREFIX_LEN);
    let prefix = reader.read_bytes(prefix_len)?;
    reader.skip(len - prefix_len)?;
    Ok(sniff_color_format(&prefix).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::create_from_bytes;
    use crate::converter::encode_png;
    use crate::error::ErrorKind;
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 128]))).unwrap()
    }

    #[test]
    fn test_inspect_v1() {
        let encoded = create_from_bytes(&png(24, 12), ContainerVersion::V1, 90).unwrap();
        let info = inspect_reader(Cursor::new(encoded.bytes), Path::new("a.mtx")).unwrap();

        assert_eq!(info.version(), ContainerVersion::V1);
        assert_eq!(info.images.len(), 2);
        assert_eq!(info.images[0].dimensions, Some((12, 6)));
        assert_eq!(info.images[0].offset, 12);
        assert_eq!(info.images[1].dimensions, Some((24, 12)));
        assert_eq!(info.images[1].color_format, Some(ColorFormat::Jpeg));
        assert_eq!(info.trailing_bytes, 0);
    }

    #[test]
    fn test_inspect_v0() {
        let encoded = create_from_bytes(&png(8, 8), ContainerVersion::V0, 75).unwrap();
        let size = encoded.bytes.len() as u64;
        let info = inspect_reader(Cursor::new(encoded.bytes), Path::new("a.mtx")).unwrap();

        assert_eq!(info.file_size, size);
        let total: u64 = info.images.iter().map(|i| i.color_len).sum();
        assert_eq!(total + 12, size);
        assert!(info.images.iter().all(|i| i.color_format == Some(ColorFormat::Jpeg)));
    }

    #[test]
    fn test_inspect_size_mismatch() {
        let mut bytes = create_from_bytes(&png(8, 8), ContainerVersion::V1, 90).unwrap().bytes;
        bytes.truncate(bytes.len() - 1);
        let err = inspect_reader(Cursor::new(bytes), Path::new("a.mtx")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeMismatch);
    }

    #[test]
    fn test_info_serializes() {
        let encoded = create_from_bytes(&png(4, 4), ContainerVersion::V1, 90).unwrap();
        let info = inspect_reader(Cursor::new(encoded.bytes), Path::new("a.mtx")).unwrap();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["header"]["version"], "V1");
        assert_eq!(json["images"].as_array().map(Vec::len), Some(2));
    }
}
