//! V0: two raw JPEG streams back to back

use std::io::{Read, Seek};

use tracing::debug;

use super::ExtractPlan;
use crate::container::types::ExtractWarning;
use crate::error::Result;
use crate::formats::mtx::{ChunkReader, ContainerVersion, HeaderV0V1};

pub(super) fn extract<R: Read + Seek>(reader: &mut ChunkReader<R>) -> Result<ExtractPlan> {
    let header: HeaderV0V1 = reader.read_header()?;
    debug!(
        "V0 header: first {} bytes, second {} bytes",
        header.length_first, header.length_second
    );

    let mut plan = ExtractPlan::new(ContainerVersion::V0);
    for (index, len) in [(1, header.length_first), (2, header.length_second)] {
        if len == 0 {
            plan.warn(ExtractWarning::EmptyImage { index });
            continue;
        }
        debug!("Image {index}: {len} bytes at offset {}", reader.position());
        let data = reader.read_bytes(u64::from(len))?;
        plan.push(index, None, data);
    }

    plan.check_trailing(reader);
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use std::io::Cursor;

    fn container(first: &[u8], second: &[u8], declared: (u32, u32)) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&declared.0.to_le_bytes());
        data.extend_from_slice(&declared.1.to_le_bytes());
        data.extend_from_slice(first);
        data.extend_from_slice(second);
        data
    }

    #[test]
    fn test_two_streams() {
        let data = container(b"first", b"second!", (5, 7));
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        let plan = extract(&mut reader).unwrap();
        assert_eq!(plan.outputs.len(), 2);
        assert_eq!(plan.outputs[0].data, b"first");
        assert_eq!(plan.outputs[1].index, 2);
        assert_eq!(plan.outputs[1].data, b"second!");
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_empty_slot_keeps_index() {
        let data = container(b"", b"only", (0, 4));
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        let plan = extract(&mut reader).unwrap();
        assert_eq!(plan.outputs.len(), 1);
        assert_eq!(plan.outputs[0].index, 2);
        assert_eq!(plan.warnings, vec![ExtractWarning::EmptyImage { index: 1 }]);
    }

    #[test]
    fn test_trailing_data() {
        let data = container(b"ab", b"cd", (2, 1));
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        let plan = extract(&mut reader).unwrap();
        assert_eq!(
            plan.warnings,
            vec![ExtractWarning::TrailingData { offset: 15, len: 1 }]
        );
    }

    #[test]
    fn test_stream_past_end() {
        let data = container(b"ab", b"cd", (2, 9));
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        let err = extract(&mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeMismatch);
        assert!(matches!(err, Error::TruncatedChunk { declared: 9, .. }));
    }
}
