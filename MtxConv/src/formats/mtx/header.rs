//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Fixed-layout MTX headers

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;

use super::{
    BLOCK_HEADER_V1_SIZE, BLOCK_MAGIC_V1, ContainerVersion, HEADER_V0V1_SIZE, HEADER_V2_SIZE,
    PVR_HEADER_SIZE, PVR_MAGIC, V2_UNKNOWN_VALUE,
};
use crate::error::{Error, Result};

/// A fixed-size little-endian structure with an explicit on-disk layout
pub trait BinaryHeader: Sized {
    /// Size on disk in bytes
    const SIZE: usize;
    /// Name used in error messages
    const NAME: &'static str;

    /// Parse from exactly [`Self::SIZE`] bytes (extra bytes are ignored).
    ///
    /// # Errors
    /// Returns [`Error::MalformedHeader`] if fewer than [`Self::SIZE`] bytes are given.
    fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(Error::MalformedHeader {
                structure: Self::NAME,
                offset: 0,
                expected: Self::SIZE,
                available: bytes.len() as u64,
            });
        }
        Self::read_fields(&mut Cursor::new(&bytes[..Self::SIZE]))
    }

    /// Read the fields in order. Callers guarantee [`Self::SIZE`] bytes are available.
    fn read_fields<R: Read>(reader: &mut R) -> Result<Self>;

    /// Write the fields in order
    ///
    /// # Errors
    /// Returns an error if the writer fails.
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()>;

    /// Serialize to a freshly allocated buffer of [`Self::SIZE`] bytes
    ///
    /// # Errors
    /// Never fails in practice; writing to a `Vec` is infallible.
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(Self::SIZE);
        self.write_to(&mut out)?;
        Ok(out)
    }
}

// ============================================================================
// V0 / V1
// ============================================================================

/// Shared V0/V1 file header (12 bytes)
///
/// In V0 the lengths are raw JPEG stream sizes; in V1 they are whole block
/// sizes including the block header and both chunk prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderV0V1 {
    /// Version discriminant (0 or 1)
    pub magic: u32,
    /// Length of the first (scaled) image or block
    pub length_first: u32,
    /// Length of the second (full size) image or block
    pub length_second: u32,
}

impl HeaderV0V1 {
    /// Build a header for `version` with the given lengths
    #[must_use]
    pub fn new(version: ContainerVersion, length_first: u32, length_second: u32) -> Self {
        Self {
            magic: version.discriminant(),
            length_first,
            length_second,
        }
    }

    /// Sum of both length fields
    #[must_use]
    pub fn total_length(&self) -> u64 {
        u64::from(self.length_first) + u64::from(self.length_second)
    }
}

impl BinaryHeader for HeaderV0V1 {
    const SIZE: usize = HEADER_V0V1_SIZE;
    const NAME: &'static str = "V0/V1 file header";

    fn read_fields<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            magic: reader.read_u32::<LittleEndian>()?,
            length_first: reader.read_u32::<LittleEndian>()?,
            length_second: reader.read_u32::<LittleEndian>()?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LittleEndian>(self.magic)?;
        writer.write_u32::<LittleEndian>(self.length_first)?;
        writer.write_u32::<LittleEndian>(self.length_second)?;
        Ok(())
    }
}

/// V1 block header (12 bytes), one per image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockHeaderV1 {
    /// Block magic, written as 1
    pub magic: u32,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl BlockHeaderV1 {
    /// Block header for an image of the given size
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            magic: BLOCK_MAGIC_V1,
            width,
            height,
        }
    }

    /// Number of alpha bytes the block's mask must inflate to
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl BinaryHeader for BlockHeaderV1 {
    const SIZE: usize = BLOCK_HEADER_V1_SIZE;
    const NAME: &'static str = "V1 block header";

    fn read_fields<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            magic: reader.read_u32::<LittleEndian>()?,
            width: reader.read_u32::<LittleEndian>()?,
            height: reader.read_u32::<LittleEndian>()?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LittleEndian>(self.magic)?;
        writer.write_u32::<LittleEndian>(self.width)?;
        writer.write_u32::<LittleEndian>(self.height)?;
        Ok(())
    }
}

// ============================================================================
// V2
// ============================================================================

/// V2 file header (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderV2 {
    /// Version discriminant (2)
    pub magic: u32,
    /// Always 256 in known files
    pub unknown: u16,
}

impl Default for HeaderV2 {
    fn default() -> Self {
        Self {
            magic: ContainerVersion::V2.discriminant(),
            unknown: V2_UNKNOWN_VALUE,
        }
    }
}

impl BinaryHeader for HeaderV2 {
    const SIZE: usize = HEADER_V2_SIZE;
    const NAME: &'static str = "V2 file header";

    fn read_fields<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            magic: reader.read_u32::<LittleEndian>()?,
            unknown: reader.read_u16::<LittleEndian>()?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LittleEndian>(self.magic)?;
        writer.write_u16::<LittleEndian>(self.unknown)?;
        Ok(())
    }
}

/// Legacy PVR (v2) texture header wrapped by V2 containers (52 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PvrHeader {
    pub header_size: u32,
    pub height: u32,
    pub width: u32,
    pub mipmap_count: u32,
    pub pixel_format_flags: u32,
    pub compressed_data_size: u32,
    pub bit_count: u32,
    pub bit_mask_r: u32,
    pub bit_mask_g: u32,
    pub bit_mask_b: u32,
    pub bit_mask_a: u32,
    /// Must be `"PVR!"`
    pub magic: [u8; 4],
    pub num_surfaces: u32,
}

impl PvrHeader {
    /// Whether the magic reads `"PVR!"`
    #[must_use]
    pub fn has_valid_magic(&self) -> bool {
        self.magic == PVR_MAGIC
    }

    /// Bytes of the whole PVR stream: its own header plus the texture data
    #[must_use]
    pub fn payload_len(&self) -> u64 {
        u64::from(self.header_size) + u64::from(self.compressed_data_size)
    }
}

impl BinaryHeader for PvrHeader {
    const SIZE: usize = PVR_HEADER_SIZE;
    const NAME: &'static str = "PVR header";

    fn read_fields<R: Read>(reader: &mut R) -> Result<Self> {
        let header_size = reader.read_u32::<LittleEndian>()?;
        let height = reader.read_u32::<LittleEndian>()?;
        let width = reader.read_u32::<LittleEndian>()?;
        let mipmap_count = reader.read_u32::<LittleEndian>()?;
        let pixel_format_flags = reader.read_u32::<LittleEndian>()?;
        let compressed_data_size = reader.read_u32::<LittleEndian>()?;
        let bit_count = reader.read_u32::<LittleEndian>()?;
        let bit_mask_r = reader.read_u32::<LittleEndian>()?;
        let bit_mask_g = reader.read_u32::<LittleEndian>()?;
        let bit_mask_b = reader.read_u32::<LittleEndian>()?;
        let bit_mask_a = reader.read_u32::<LittleEndian>()?;
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        let num_surfaces = reader.read_u32::<LittleEndian>()?;

        Ok(Self {
            header_size,
            height,
            width,
            mipmap_count,
            pixel_format_flags,
            compressed_data_size,
            bit_count,
            bit_mask_r,
            bit_mask_g,
            bit_mask_b,
            bit_mask_a,
            magic,
            num_surfaces,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for field in [
            self.header_size,
            self.height,
            self.width,
            self.mipmap_count,
            self.pixel_format_flags,
            self.compressed_data_size,
            self.bit_count,
            self.bit_mask_r,
            self.bit_mask_g,
            self.bit_mask_b,
            self.bit_mask_a,
        ] {
            writer.write_u32::<LittleEndian>(field)?;
        }
        writer.write_all(&self.magic)?;
        writer.write_u32::<LittleEndian>(self.num_surfaces)?;
        Ok(())
    }
}

// ============================================================================
// Version-tagged header
// ============================================================================

/// A parsed file header, tagged by version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "version")]
pub enum FileHeader {
    V0(HeaderV0V1),
    V1(HeaderV0V1),
    V2(HeaderV2),
}

impl FileHeader {
    /// The version this header belongs to
    #[must_use]
    pub fn version(&self) -> ContainerVersion {
        match self {
            Self::V0(_) => ContainerVersion::V0,
            Self::V1(_) => ContainerVersion::V1,
            Self::V2(_) => ContainerVersion::V2,
        }
    }

    /// Size of the header on disk
    #[must_use]
    pub fn size(&self) -> usize {
        self.version().header_size()
    }
}
