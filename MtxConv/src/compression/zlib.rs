//! Zlib alpha plane codec
//!
//! Writers use the best compression level. Readers accept any valid zlib
//! stream, whatever level produced it.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{Error, Result};

/// Compress a raw alpha plane
///
/// # Errors
/// Returns an error if the encoder fails.
pub fn compress_alpha(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Inflate an alpha plane that must hold exactly `expected_len` bytes
///
/// # Errors
/// Returns [`Error::AlphaDecompressionFailed`] for a corrupt or cut-off
/// stream and [`Error::AlphaSizeMismatch`] if it inflates to a different length.
pub fn decompress_alpha(data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut decompressed = Vec::with_capacity(expected_len);

    // One byte past the expected size is enough to detect an oversized plane
    // without inflating an arbitrarily large stream.
    decoder
        .by_ref()
        .take(expected_len as u64 + 1)
        .read_to_end(&mut decompressed)
        .map_err(|e| Error::AlphaDecompressionFailed {
            message: e.to_string(),
        })?;

    if decompressed.len() != expected_len {
        return Err(Error::AlphaSizeMismatch {
            expected: expected_len,
            actual: decompressed.len(),
        });
    }

    Ok(decompressed)
}
