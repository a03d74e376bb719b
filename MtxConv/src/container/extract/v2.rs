//! V2: 6-byte header in front of a verbatim PVR texture

use std::io::{Read, Seek};

use tracing::debug;

use super::ExtractPlan;
use crate::error::{Error, Result};
use crate::formats::mtx::{
    ChunkReader, ContainerVersion, HeaderV2, PvrHeader, V2_UNKNOWN_VALUE, check_image_bounds,
};

pub(super) fn extract<R: Read + Seek>(reader: &mut ChunkReader<R>) -> Result<ExtractPlan> {
    let header: HeaderV2 = reader.read_header()?;
    if header.unknown != V2_UNKNOWN_VALUE {
        debug!("V2 header carries unusual value {}", header.unknown);
    }

    let start = reader.position();
    let pvr: PvrHeader = reader.read_header()?;
    if !pvr.has_valid_magic() {
        return Err(Error::InvalidPvrMagic(pvr.magic));
    }
    check_image_bounds(pvr.width, pvr.height)?;
    debug!(
        "PVR {}x{}, {} mipmaps, flags {:#x}",
        pvr.width, pvr.height, pvr.mipmap_count, pvr.pixel_format_flags
    );

    reader.seek_to(start)?;
    let declared = pvr.payload_len();
    let available = reader.remaining();
    if declared > available {
        return Err(Error::PayloadOverrun {
            declared,
            available,
        });
    }

    let mut plan = ExtractPlan::new(ContainerVersion::V2);
    plan.push(1, Some((pvr.width, pvr.height)), reader.read_bytes(declared)?);
    plan.check_trailing(reader);
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::types::ExtractWarning;
    use crate::error::ErrorKind;
    use crate::formats::mtx::{BinaryHeader, PVR_MAGIC};
    use std::io::Cursor;

    fn pvr_stream(width: u32, height: u32, data_len: u32) -> Vec<u8> {
        let header = PvrHeader {
            header_size: 52,
            height,
            width,
            mipmap_count: 1,
            pixel_format_flags: 0x8019,
            compressed_data_size: data_len,
            bit_count: 4,
            bit_mask_r: 0,
            bit_mask_g: 0,
            bit_mask_b: 0,
            bit_mask_a: 1,
            magic: PVR_MAGIC,
            num_surfaces: 1,
        };
        let mut bytes = header.to_bytes().unwrap();
        bytes.extend((0..data_len).map(|i| i as u8));
        bytes
    }

    fn container(pvr: &[u8]) -> Vec<u8> {
        let mut data = HeaderV2::default().to_bytes().unwrap();
        data.extend_from_slice(pvr);
        data
    }

    #[test]
    fn test_payload_copied_verbatim() {
        let pvr = pvr_stream(8, 8, 32);
        let mut reader = ChunkReader::new(Cursor::new(container(&pvr))).unwrap();
        let plan = extract(&mut reader).unwrap();
        assert_eq!(plan.outputs.len(), 1);
        assert_eq!(plan.outputs[0].data, pvr);
        assert_eq!(plan.outputs[0].dimensions, Some((8, 8)));
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_bad_magic() {
        let mut pvr = pvr_stream(8, 8, 32);
        pvr[44..48].copy_from_slice(b"DDS ");
        let mut reader = ChunkReader::new(Cursor::new(container(&pvr))).unwrap();
        let err = extract(&mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    }

    #[test]
    fn test_payload_overrun() {
        let mut pvr = pvr_stream(8, 8, 32);
        pvr.truncate(70);
        let mut reader = ChunkReader::new(Cursor::new(container(&pvr))).unwrap();
        let err = extract(&mut reader).unwrap_err();
        assert!(matches!(err, Error::PayloadOverrun { declared: 84, available: 70 }));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut pvr = pvr_stream(4, 4, 16);
        pvr.extend_from_slice(&[0; 5]);
        let mut reader = ChunkReader::new(Cursor::new(container(&pvr))).unwrap();
        let plan = extract(&mut reader).unwrap();
        assert_eq!(plan.outputs[0].data.len(), 68);
        assert_eq!(
            plan.warnings,
            vec![ExtractWarning::TrailingData { offset: 74, len: 5 }]
        );
    }

    #[test]
    fn test_oversized_texture() {
        let pvr = pvr_stream(8192, 8, 16);
        let mut reader = ChunkReader::new(Cursor::new(container(&pvr))).unwrap();
        let err = extract(&mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OversizedImage);
    }
}
