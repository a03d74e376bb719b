//! Error types for `MtxConv`

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of an [`Error`].
///
/// Every error maps to exactly one kind, which is what callers (and the CLI)
/// usually branch on. The variants of [`Error`] carry the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown version discriminant or unsupported version selector.
    UnsupportedVersion,
    /// Short read while parsing a fixed-size structure.
    MalformedHeader,
    /// Declared sizes or dimensions disagree with the actual data.
    SizeMismatch,
    /// Width or height above the 4096 pixel limit.
    OversizedImage,
    /// Color stream or alpha stream could not be decoded.
    DecodeFailure,
    /// Color plane could not be encoded.
    EncodeFailure,
    /// Input extension / target version combination is not allowed.
    InvalidInputFormat,
    /// Filesystem error.
    IoFailure,
    /// Input file above the 1 GiB limit.
    FileTooLarge,
    /// Input file too small to hold a container of its version.
    FileTooSmall,
}

/// The error type for `MtxConv` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input path is not a regular file.
    #[error("not a regular file: {path}")]
    NotAFile {
        /// The offending path.
        path: PathBuf,
    },

    // ==================== Version Errors ====================
    /// The version discriminant at offset 0 is not 0, 1 or 2.
    #[error("unsupported MTX version: {version} (supported: 0, 1, 2)")]
    UnsupportedVersion {
        /// The discriminant found in the file.
        version: u32,
    },

    /// The requested target version selector is out of range.
    #[error("an MTX target version of {selector} is unsupported (supported: -1, 0, 1, 2)")]
    UnsupportedTargetVersion {
        /// The selector that was passed in.
        selector: i32,
    },

    // ==================== Structure Errors ====================
    /// A fixed-size structure could not be read in full.
    #[error("malformed {structure} at offset {offset}: expected {expected} bytes, {available} available")]
    MalformedHeader {
        /// Name of the structure being parsed.
        structure: &'static str,
        /// Byte offset the structure starts at.
        offset: u64,
        /// Size of the structure.
        expected: usize,
        /// Bytes that were actually available.
        available: u64,
    },

    /// A length-prefixed chunk runs past the end of the file.
    #[error("truncated chunk at offset {offset}: declared {declared} bytes, {available} available")]
    TruncatedChunk {
        /// Byte offset of the chunk data.
        offset: u64,
        /// Length from the chunk prefix.
        declared: u64,
        /// Bytes left in the file.
        available: u64,
    },

    /// The header's declared total does not match the file size.
    #[error("size mismatch: header declares {declared} bytes of image data, file holds {actual}")]
    DeclaredSizeMismatch {
        /// Sum of the header's length fields.
        declared: u64,
        /// File size minus the header size.
        actual: u64,
    },

    /// A V1 block did not consume the number of bytes its header length declared.
    #[error("block {index} declares {declared} bytes but spans {actual}")]
    BlockLengthMismatch {
        /// 1-based block index.
        index: usize,
        /// Length from the file header.
        declared: u64,
        /// Bytes actually consumed.
        actual: u64,
    },

    /// The decoded color image does not match the declared dimensions.
    #[error("size mismatch between color image ({color_width}x{color_height}) and alpha mask ({mask_width}x{mask_height})")]
    DimensionMismatch {
        /// Decoded color width.
        color_width: u32,
        /// Decoded color height.
        color_height: u32,
        /// Declared mask width.
        mask_width: u32,
        /// Declared mask height.
        mask_height: u32,
    },

    /// The alpha plane does not hold exactly one byte per pixel.
    #[error("alpha plane holds {actual} bytes, expected {expected}")]
    AlphaSizeMismatch {
        /// width * height.
        expected: usize,
        /// Actual length of the plane.
        actual: usize,
    },

    /// The wrapped PVR payload overruns the file.
    #[error("PVR payload declares {declared} bytes, {available} available")]
    PayloadOverrun {
        /// header_size + compressed_data_size.
        declared: u64,
        /// Bytes left in the file.
        available: u64,
    },

    // ==================== Bounds Errors ====================
    /// Width or height above [`MAX_IMAGE_BOUNDS`](crate::formats::mtx::MAX_IMAGE_BOUNDS).
    #[error("image is {width}x{height}, larger than 4096 pixels on either axis")]
    OversizedImage {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// Input file is above the size limit.
    #[error("file is {size} bytes, larger than 1 GiB")]
    FileTooLarge {
        /// Size of the file.
        size: u64,
    },

    /// Input file is below the minimum for its version.
    #[error("file is {size} bytes, too small to be a valid container (minimum {minimum})")]
    FileTooSmall {
        /// Size of the file.
        size: u64,
        /// Minimum size for the detected version.
        minimum: u64,
    },

    // ==================== Decode / Encode Errors ====================
    /// The color chunk is neither JPEG nor PNG.
    #[error("color stream is not a recognized image format: {detail}")]
    UnrecognizedImageFormat {
        /// What the sniffer found instead.
        detail: String,
    },

    /// Decoding an image stream or input file failed.
    #[error("failed to decode image: {message}")]
    ImageDecodeFailed {
        /// The decoder's message.
        message: String,
    },

    /// Inflating an alpha plane failed.
    #[error("failed to decompress alpha plane: {message}")]
    AlphaDecompressionFailed {
        /// The zlib error message.
        message: String,
    },

    /// The V2 sub-header does not carry the PVR magic.
    #[error("unsupported wrapped format: expected PVR!, found {0:?}")]
    InvalidPvrMagic([u8; 4]),

    /// JPEG or PNG encoding failed.
    #[error("failed to encode {format}: {message}")]
    ImageEncodeFailed {
        /// Target format name.
        format: &'static str,
        /// The encoder's message.
        message: String,
    },

    /// Chunk data larger than a u32 length prefix can describe.
    #[error("chunk of {len} bytes exceeds the 4 GiB chunk limit")]
    ChunkTooLarge {
        /// Length of the data.
        len: usize,
    },

    // ==================== Input Validation Errors ====================
    /// The input is already an MTX container.
    #[error("already an MTX file: {path}")]
    AlreadyContainer {
        /// The input path.
        path: PathBuf,
    },

    /// The input extension cannot be baked at all.
    #[error("unsupported input file format: {extension:?}")]
    UnsupportedInputFormat {
        /// The extension (lowercased), empty when missing.
        extension: String,
    },

    /// The input extension is not allowed with the requested target version.
    #[error("{format} files are only supported with MTX target version {allowed}")]
    IncompatibleTarget {
        /// Input format name.
        format: &'static str,
        /// Allowed versions, human readable.
        allowed: &'static str,
    },

    /// JPEG quality outside 1..=100.
    #[error("JPEG quality {0} is out of range (1-100)")]
    InvalidJpegQuality(u8),
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) | Self::NotAFile { .. } => ErrorKind::IoFailure,
            Self::UnsupportedVersion { .. } | Self::UnsupportedTargetVersion { .. } => {
                ErrorKind::UnsupportedVersion
            }
            Self::MalformedHeader { .. } => ErrorKind::MalformedHeader,
            Self::TruncatedChunk { .. }
            | Self::DeclaredSizeMismatch { .. }
            | Self::BlockLengthMismatch { .. }
            | Self::DimensionMismatch { .. }
            | Self::AlphaSizeMismatch { .. }
            | Self::PayloadOverrun { .. } => ErrorKind::SizeMismatch,
            Self::OversizedImage { .. } => ErrorKind::OversizedImage,
            Self::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            Self::FileTooSmall { .. } => ErrorKind::FileTooSmall,
            Self::UnrecognizedImageFormat { .. }
            | Self::ImageDecodeFailed { .. }
            | Self::AlphaDecompressionFailed { .. }
            | Self::InvalidPvrMagic(_) => ErrorKind::DecodeFailure,
            Self::ImageEncodeFailed { .. } | Self::ChunkTooLarge { .. } => ErrorKind::EncodeFailure,
            Self::AlreadyContainer { .. }
            | Self::UnsupportedInputFormat { .. }
            | Self::IncompatibleTarget { .. }
            | Self::InvalidJpegQuality(_) => ErrorKind::InvalidInputFormat,
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            other => Error::ImageDecodeFailed {
                message: other.to_string(),
            },
        }
    }
}

/// A specialized Result type for `MtxConv` operations.
pub type Result<T> = std::result::Result<T, Error>;
