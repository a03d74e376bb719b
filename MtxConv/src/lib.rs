//! # MtxConv
//!
//! A pure-Rust codec for MTX, the versioned texture container used by
//! Mediocre's mobile games.
//!
//! ## Supported Versions
//!
//! - **V0** - two raw JPEG streams (half size, then full size)
//! - **V1** - blocks of a JPEG/PNG color chunk plus a zlib alpha chunk
//! - **V2** - a wrapped PVR texture
//!
//! ## Quick Start
//!
//! ### Extracting a container
//!
//! ```no_run
//! use std::path::Path;
//! use mtxconv::container::{ExtractOptions, extract_file};
//!
//! let report = extract_file(Path::new("ui_logo.mtx"), &ExtractOptions::new())?;
//! for image in &report.outputs {
//!     println!("{}", image.path.display());
//! }
//! # Ok::<(), mtxconv::Error>(())
//! ```
//!
//! ### Baking an image
//!
//! ```no_run
//! use std::path::Path;
//! use mtxconv::container::{CreateOptions, create_file};
//! use mtxconv::formats::{ContainerVersion, TargetVersion};
//!
//! let options = CreateOptions::new()
//!     .with_target(TargetVersion::Exact(ContainerVersion::V1))
//!     .with_jpeg_quality(85);
//! let report = create_file(Path::new("ui_logo.png"), &options)?;
//! println!("wrote {}", report.output.display());
//! # Ok::<(), mtxconv::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use mtxconv::prelude::*;
//!
//! let options = ExtractOptions::new().with_dry_run(true);
//! assert!(options.dry_run);
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `mtxconv` command-line binary

pub mod compression;
pub mod container;
pub mod converter;
pub mod error;
pub mod formats;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::formats::{ContainerVersion, FileHeader, TargetVersion};

    pub use crate::container::{
        ContainerInfo, CreateOptions, CreateReport, ExtractOptions, ExtractReport, ExtractWarning,
        create_file, extract_file, inspect_file,
    };

    // Batch operations
    pub use crate::container::{
        BatchResult, FileOutcome, create_batch, create_batch_parallel, extract_batch,
        extract_batch_parallel, find_container_files,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
