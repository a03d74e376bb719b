//! MTX container operations module
//!
//! Extraction turns a container back into standard image files, creation
//! ("baking") builds a container from an image, and inspection describes a
//! container without writing anything. Every operation works on one file and
//! returns a typed report; [`batch`] runs them over many files.

mod batch;
mod create;
mod extract;
mod inspect;
mod options;
mod paths;
mod types;

// Primary public API
pub use create::{create_file, create_from_bytes, resolve_target_version};
pub use extract::{extract_file, extract_from_reader};
pub use inspect::{inspect_file, inspect_reader};

// Configuration and reports
pub use options::{CreateOptions, DEFAULT_JPEG_QUALITY, ExtractOptions};
pub use types::{
    ContainerInfo, CreateReport, EncodedContainer, ExtractReport, ExtractWarning, ExtractedImage,
    ImageInfo, OutputKind,
};

// Path conventions
pub use paths::{creation_output_path, extraction_base_name, extraction_output_path};

// Re-export batch operations
pub use batch::{
    BatchProgress, BatchResult, FileOutcome, create_batch, create_batch_parallel, extract_batch,
    extract_batch_parallel, find_container_files,
};

use std::fs;
use std::io::{Read, Seek};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::formats::mtx::{ChunkReader, ContainerVersion, MAX_INPUT_FILE_SIZE, MIN_SNIFF_SIZE};

/// Stat an input path, requiring a regular file no larger than 1 GiB.
/// Returns the file size.
pub(crate) fn check_input_file(path: &Path) -> Result<u64> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(Error::NotAFile {
            path: path.to_path_buf(),
        });
    }
    check_max_size(metadata.len())?;
    Ok(metadata.len())
}

pub(crate) fn check_max_size(size: u64) -> Result<()> {
    if size > MAX_INPUT_FILE_SIZE {
        return Err(Error::FileTooLarge { size });
    }
    Ok(())
}

pub(crate) fn check_min_size(size: u64, minimum: u64) -> Result<()> {
    if size < minimum {
        return Err(Error::FileTooSmall { size, minimum });
    }
    Ok(())
}

/// Check the stream size, read the version discriminant and rewind to 0
pub(crate) fn sniff_version<R: Read + Seek>(reader: &mut ChunkReader<R>) -> Result<ContainerVersion> {
    let size = reader.len();
    check_max_size(size)?;
    check_min_size(size, MIN_SNIFF_SIZE)?;

    let version = ContainerVersion::from_discriminant(reader.read_u32("version discriminant")?)?;
    check_min_size(size, version.min_file_size())?;
    reader.seek_to(0)?;

    debug!("Detected {version} container ({size} bytes)");
    Ok(version)
}
