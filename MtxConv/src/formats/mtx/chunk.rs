//! Position-tracking chunk reader and writer
//!
//! A chunk is a u32 little-endian length prefix followed by that many bytes.
//! Reads never truncate silently: anything that would run past the end of
//! the stream fails before touching the underlying reader.

use std::io::{self, Read, Seek, SeekFrom, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use super::header::BinaryHeader;
use crate::error::{Error, Result};

/// Size of a chunk length prefix
pub const CHUNK_LENGTH_SIZE: usize = 4;

/// Sequential reader over a seekable MTX byte source
pub struct ChunkReader<R: Read + Seek> {
    reader: R,
    position: u64,
    len: u64,
}

impl<R: Read + Seek> ChunkReader<R> {
    /// Wrap a reader, measuring its length. The reader is rewound to 0.
    ///
    /// # Errors
    /// Returns an error if seeking fails.
    pub fn new(mut reader: R) -> Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self {
            reader,
            position: 0,
            len,
        })
    }

    /// Current byte offset
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Total stream length
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the stream is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes left after the current position
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.position)
    }

    /// Whether the current position is at (or past) the end
    pub fn is_eof(&self) -> bool {
        self.position >= self.len
    }

    /// Move to an absolute offset
    ///
    /// # Errors
    /// Returns an error if seeking fails.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.position = self.reader.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Read exactly `count` bytes of chunk data.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedChunk`] if fewer than `count` bytes remain.
    pub fn read_bytes(&mut self, count: u64) -> Result<Vec<u8>> {
        let offset = self.position;
        let available = self.remaining();
        if count > available {
            return Err(Error::TruncatedChunk {
                offset,
                declared: count,
                available,
            });
        }

        let mut data = vec![0u8; count as usize];
        self.reader.read_exact(&mut data).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                Error::TruncatedChunk {
                    offset,
                    declared: count,
                    available,
                }
            } else {
                Error::Io(e)
            }
        })?;
        self.position += count;
        Ok(data)
    }

    /// Advance past `count` bytes without reading them
    ///
    /// # Errors
    /// Returns [`Error::TruncatedChunk`] if fewer than `count` bytes remain.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        let available = self.remaining();
        if count > available {
            return Err(Error::TruncatedChunk {
                offset: self.position,
                declared: count,
                available,
            });
        }
        self.seek_to(self.position + count)
    }

    /// Read a u32 little-endian value (a chunk prefix or discriminant)
    ///
    /// # Errors
    /// Returns [`Error::MalformedHeader`] if fewer than four bytes remain.
    pub fn read_u32(&mut self, what: &'static str) -> Result<u32> {
        let bytes = self.read_fixed(CHUNK_LENGTH_SIZE, what)?;
        Ok(LittleEndian::read_u32(&bytes))
    }

    /// Read and parse a fixed-size header
    ///
    /// # Errors
    /// Returns [`Error::MalformedHeader`] on a short read.
    pub fn read_header<H: BinaryHeader>(&mut self) -> Result<H> {
        let bytes = self.read_fixed(H::SIZE, H::NAME)?;
        H::parse(&bytes)
    }

    /// Read a length-prefixed chunk
    ///
    /// # Errors
    /// Returns [`Error::MalformedHeader`] if the prefix is cut off and
    /// [`Error::TruncatedChunk`] if the data is.
    pub fn read_chunk(&mut self, what: &'static str) -> Result<Vec<u8>> {
        let len = self.read_u32(what)?;
        self.read_bytes(u64::from(len))
    }

    /// Read a fixed structure, reporting short reads as malformed headers
    fn read_fixed(&mut self, size: usize, structure: &'static str) -> Result<Vec<u8>> {
        let offset = self.position;
        let available = self.remaining();
        self.read_bytes(size as u64).map_err(|e| match e {
            Error::TruncatedChunk { .. } => Error::MalformedHeader {
                structure,
                offset,
                expected: size,
                available,
            },
            other => other,
        })
    }

    /// Unwrap the inner reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Sequential writer producing MTX byte layouts
pub struct ChunkWriter<W: Write> {
    writer: W,
    position: u64,
}

impl<W: Write> ChunkWriter<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            position: 0,
        }
    }

    /// Bytes written so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Write a fixed-size header
    ///
    /// # Errors
    /// Returns an error if the writer fails.
    pub fn write_header<H: BinaryHeader>(&mut self, header: &H) -> Result<()> {
        header.write_to(&mut self.writer)?;
        self.position += H::SIZE as u64;
        Ok(())
    }

    /// Write a length-prefixed chunk
    ///
    /// # Errors
    /// Returns [`Error::ChunkTooLarge`] if `data` does not fit a u32 prefix.
    pub fn write_chunk(&mut self, data: &[u8]) -> Result<()> {
        let len = u32::try_from(data.len()).map_err(|_| Error::ChunkTooLarge { len: data.len() })?;
        self.writer.write_u32::<LittleEndian>(len)?;
        self.position += CHUNK_LENGTH_SIZE as u64;
        self.write_raw(data)
    }

    /// Write bytes without framing
    ///
    /// # Errors
    /// Returns an error if the writer fails.
    pub fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    /// Flush and return the inner writer
    ///
    /// # Errors
    /// Returns an error if flushing fails.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::formats::mtx::{BlockHeaderV1, HeaderV0V1};
    use std::io::Cursor;

    #[test]
    fn test_write_then_read_chunks() {
        let mut writer = ChunkWriter::new(Vec::new());
        writer.write_header(&BlockHeaderV1::new(2, 3)).unwrap();
        writer.write_chunk(b"color").unwrap();
        writer.write_chunk(b"").unwrap();
        assert_eq!(writer.position(), 12 + 4 + 5 + 4);
        let bytes = writer.finish().unwrap();

        let mut reader = ChunkReader::new(Cursor::new(bytes)).unwrap();
        let block: BlockHeaderV1 = reader.read_header().unwrap();
        assert_eq!((block.width, block.height), (2, 3));
        assert_eq!(reader.read_chunk("color").unwrap(), b"color");
        assert!(reader.read_chunk("alpha").unwrap().is_empty());
        assert!(reader.is_eof());
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_truncated_chunk() {
        let mut data = 10u32.to_le_bytes().to_vec();
        data.extend_from_slice(b"abc");
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        let err = reader.read_chunk("color").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeMismatch);
        assert!(matches!(
            err,
            Error::TruncatedChunk { offset: 4, declared: 10, available: 3 }
        ));
    }

    #[test]
    fn test_short_header_read() {
        let mut reader = ChunkReader::new(Cursor::new(vec![1u8, 0, 0, 0, 5])).unwrap();
        let err = reader.read_header::<HeaderV0V1>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedHeader);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_seek_and_position() {
        let mut reader = ChunkReader::new(Cursor::new(vec![7u8; 16])).unwrap();
        assert_eq!(reader.len(), 16);
        reader.read_bytes(6).unwrap();
        assert_eq!(reader.position(), 6);
        reader.seek_to(0).unwrap();
        assert_eq!(reader.read_u32("value").unwrap(), 0x0707_0707);
    }
}
