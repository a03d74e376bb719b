//! Report types for container operations

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::converter::ColorFormat;
use crate::formats::mtx::{ContainerVersion, FileHeader, PvrHeader};

// ============================================================================
// Extraction
// ============================================================================

/// Kind of file produced by extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputKind {
    /// Raw JPEG copied out of a V0 container
    Jpeg,
    /// Composited RGBA image from a V1 block
    Png,
    /// Wrapped PVR texture from a V2 container
    Pvr,
}

impl OutputKind {
    /// Output kind for a container version
    #[must_use]
    pub fn for_version(version: ContainerVersion) -> Self {
        match version {
            ContainerVersion::V0 => Self::Jpeg,
            ContainerVersion::V1 => Self::Png,
            ContainerVersion::V2 => Self::Pvr,
        }
    }
}

/// One file extracted (or, in dry-run mode, that would have been)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    /// Output path
    pub path: PathBuf,
    /// 1-based image index within the container
    pub index: usize,
    /// What kind of file it is
    pub kind: OutputKind,
    /// Dimensions, when the container declares them
    pub dimensions: Option<(u32, u32)>,
    /// Size of the output in bytes
    pub size: u64,
}

/// Non-fatal conditions found during extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractWarning {
    /// Bytes left over after the last expected image or block
    TrailingData {
        /// Offset the leftover bytes start at
        offset: u64,
        /// Number of leftover bytes
        len: u64,
    },
    /// A V1 container holds more than two blocks
    ExtraBlocks {
        /// Total number of blocks found
        count: usize,
    },
    /// A V0 image slot has zero length and was skipped
    EmptyImage {
        /// 1-based index of the slot
        index: usize,
    },
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrailingData { offset, len } => {
                write!(f, "{len} bytes of trailing data at offset {offset}")
            }
            Self::ExtraBlocks { count } => {
                write!(f, "found {count} image blocks, more than the expected 2")
            }
            Self::EmptyImage { index } => write!(f, "image {index} is empty and was skipped"),
        }
    }
}

/// Result of extracting one container
#[derive(Debug, Clone)]
pub struct ExtractReport {
    /// Container that was read
    pub source: PathBuf,
    /// Container version
    pub version: ContainerVersion,
    /// Files written (or that would have been written)
    pub outputs: Vec<ExtractedImage>,
    /// Non-fatal issues
    pub warnings: Vec<ExtractWarning>,
    /// Whether writing was suppressed
    pub dry_run: bool,
}

// ============================================================================
// Creation
// ============================================================================

/// A container encoded in memory
#[derive(Debug, Clone)]
pub struct EncodedContainer {
    /// Version that was produced
    pub version: ContainerVersion,
    /// The complete file contents
    pub bytes: Vec<u8>,
    /// Dimensions of each stored image, in file order.
    /// Empty for V2, whose payload is opaque.
    pub images: Vec<(u32, u32)>,
}

/// Result of baking one image
#[derive(Debug, Clone)]
pub struct CreateReport {
    /// Input image
    pub source: PathBuf,
    /// Container path (written, or that would have been written)
    pub output: PathBuf,
    /// Version that was produced
    pub version: ContainerVersion,
    /// Size of the container in bytes
    pub size: u64,
    /// Dimensions of each stored image, in file order
    pub images: Vec<(u32, u32)>,
    /// Whether writing was suppressed
    pub dry_run: bool,
}

// ============================================================================
// Inspection
// ============================================================================

/// Description of one stored image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    /// 1-based index
    pub index: usize,
    /// Offset of the image (V0 stream, V1 block header, V2 PVR header)
    pub offset: u64,
    /// Declared dimensions (V1 block header, V2 PVR header)
    pub dimensions: Option<(u32, u32)>,
    /// Sniffed color stream format (V0 and V1)
    pub color_format: Option<ColorFormat>,
    /// Color stream (V0/V1) or payload (V2) length
    pub color_len: u64,
    /// Compressed alpha length (V1)
    pub alpha_len: Option<u64>,
}

/// Description of a container
#[derive(Debug, Clone, Serialize)]
pub struct ContainerInfo {
    /// Container path
    pub path: PathBuf,
    /// File size in bytes
    pub file_size: u64,
    /// Parsed file header
    pub header: FileHeader,
    /// Wrapped PVR header (V2)
    pub pvr: Option<PvrHeader>,
    /// Stored images in file order
    pub images: Vec<ImageInfo>,
    /// Bytes after the last image
    pub trailing_bytes: u64,
}

impl ContainerInfo {
    /// Container version
    #[must_use]
    pub fn version(&self) -> ContainerVersion {
        self.header.version()
    }
}
