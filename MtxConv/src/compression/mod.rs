//! Compression utilities
//!
//! MTX stores alpha planes as zlib streams; see [`zlib`].

pub mod zlib;

pub use zlib::{compress_alpha, decompress_alpha};
