//! V2 encoder: header in front of the input, verbatim

use tracing::warn;

use crate::container::types::EncodedContainer;
use crate::error::Result;
use crate::formats::mtx::{
    BinaryHeader, ChunkWriter, ContainerVersion, HeaderV2, PVR_HEADER_SIZE, PvrHeader,
};

pub(super) fn encode(data: &[u8]) -> Result<EncodedContainer> {
    if data.len() < PVR_HEADER_SIZE {
        warn!("Input is {} bytes, too short to hold a PVR header", data.len());
    } else if !PvrHeader::parse(data)?.has_valid_magic() {
        warn!("Input does not carry the PVR! magic; wrapping it anyway");
    }

    let mut writer = ChunkWriter::new(Vec::with_capacity(data.len() + HeaderV2::SIZE));
    writer.write_header(&HeaderV2::default())?;
    writer.write_raw(data)?;

    Ok(EncodedContainer {
        version: ContainerVersion::V2,
        bytes: writer.finish()?,
        images: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_verbatim() {
        let payload: Vec<u8> = (0..100u8).collect();
        let encoded = encode(&payload).unwrap();
        assert_eq!(&encoded.bytes[..6], &[2, 0, 0, 0, 0, 1]);
        assert_eq!(&encoded.bytes[6..], &payload[..]);
        assert!(encoded.images.is_empty());
    }

    #[test]
    fn test_short_input_still_wraps() {
        let encoded = encode(b"tiny").unwrap();
        assert_eq!(encoded.bytes.len(), 10);
    }
}
