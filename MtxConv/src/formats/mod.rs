//! File format handlers
//!
//! The MTX container is the only format defined here; the color planes it
//! embeds are plain JPEG/PNG streams handled by [`crate::converter`].

pub mod mtx;

pub use mtx::{
    BinaryHeader, BlockHeaderV1, ChunkReader, ChunkWriter, ContainerVersion, FileHeader,
    HeaderV0V1, HeaderV2, PvrHeader, TargetVersion,
};
