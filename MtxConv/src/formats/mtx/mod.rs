//! MTX texture container format
//!
//! Binary container used by Mediocre's games. Three versions exist:
//!
//! - **V0** - 12-byte header followed by two raw JPEG streams
//!   (half-size thumbnail first, then the full image).
//! - **V1** - 12-byte header followed by self-delimited blocks, each holding a
//!   block header, a length-prefixed color chunk (JPEG or PNG) and a
//!   length-prefixed zlib alpha chunk.
//! - **V2** - 6-byte header followed by a verbatim PVR texture.
//!
//! All integers are little-endian. Header sizes are format constants and
//! never derived from in-memory struct layout.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

mod chunk;
mod header;
mod version;

pub use chunk::{ChunkReader, ChunkWriter, CHUNK_LENGTH_SIZE};
pub use header::{BinaryHeader, BlockHeaderV1, FileHeader, HeaderV0V1, HeaderV2, PvrHeader};
pub use version::{ContainerVersion, TargetVersion};

/// Size of the shared V0/V1 file header
pub const HEADER_V0V1_SIZE: usize = 12;

/// Size of the V2 file header
pub const HEADER_V2_SIZE: usize = 6;

/// Size of a V1 block header
pub const BLOCK_HEADER_V1_SIZE: usize = 12;

/// Size of the PVR sub-header wrapped by V2 containers
pub const PVR_HEADER_SIZE: usize = 52;

/// "PVR!" magic inside the wrapped sub-header
pub const PVR_MAGIC: [u8; 4] = *b"PVR!";

/// Observed constant in the V2 header's second field
pub const V2_UNKNOWN_VALUE: u16 = 256;

/// Magic stored in every V1 block header
pub const BLOCK_MAGIC_V1: u32 = 1;

/// Largest allowed width or height (4 KiB)
pub const MAX_IMAGE_BOUNDS: u32 = 4096;

/// Largest accepted input file (1 GiB)
pub const MAX_INPUT_FILE_SIZE: u64 = 1_073_741_824;

/// Bytes needed to sniff the version discriminant
pub const MIN_SNIFF_SIZE: u64 = 4;

/// Smallest V2 container accepted for extraction
pub const MIN_V2_FILE_SIZE: u64 = 64;

/// Fixed bytes in a V1 block besides the color and alpha data:
/// block header plus the two chunk length prefixes.
pub const BLOCK_OVERHEAD_V1: u64 = (BLOCK_HEADER_V1_SIZE + 2 * CHUNK_LENGTH_SIZE) as u64;

/// Check a width/height pair against [`MAX_IMAGE_BOUNDS`].
///
/// # Errors
/// Returns [`Error::OversizedImage`](crate::Error::OversizedImage) when either axis is too large.
pub fn check_image_bounds(width: u32, height: u32) -> crate::Result<()> {
    if width > MAX_IMAGE_BOUNDS || height > MAX_IMAGE_BOUNDS {
        return Err(crate::Error::OversizedImage { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_bounds() {
        assert!(check_image_bounds(4096, 4096).is_ok());
        assert!(check_image_bounds(1, 1).is_ok());
        let err = check_image_bounds(4097, 16).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OversizedImage);
        let err = check_image_bounds(16, 4097).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OversizedImage);
    }

    #[test]
    fn test_block_overhead() {
        assert_eq!(BLOCK_OVERHEAD_V1, 20);
    }
}
