//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Container extraction
//!
//! Each version handler reads and validates the whole container into an
//! [`ExtractPlan`] held in memory. Only when the plan is complete are the
//! outputs written, so a failing container never leaves partial results.

mod v0;
mod v1;
mod v2;

use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::paths::{extraction_base_name, extraction_output_path, output_dir_for};
use super::types::{ExtractReport, ExtractWarning, ExtractedImage, OutputKind};
use super::{ExtractOptions, check_input_file, sniff_version};
use crate::error::Result;
use crate::formats::mtx::{ChunkReader, ContainerVersion};

/// An image decoded and re-encoded in memory, waiting to be written
#[derive(Debug)]
struct PendingOutput {
    index: usize,
    dimensions: Option<(u32, u32)>,
    data: Vec<u8>,
}

/// Everything a handler recovered from one container
#[derive(Debug)]
struct ExtractPlan {
    version: ContainerVersion,
    outputs: Vec<PendingOutput>,
    warnings: Vec<ExtractWarning>,
}

impl ExtractPlan {
    fn new(version: ContainerVersion) -> Self {
        Self {
            version,
            outputs: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn push(&mut self, index: usize, dimensions: Option<(u32, u32)>, data: Vec<u8>) {
        self.outputs.push(PendingOutput {
            index,
            dimensions,
            data,
        });
    }

    fn warn(&mut self, warning: ExtractWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Record trailing bytes, if the reader has not reached the end
    fn check_trailing<R: Read + Seek>(&mut self, reader: &ChunkReader<R>) {
        if !reader.is_eof() {
            self.warn(ExtractWarning::TrailingData {
                offset: reader.position(),
                len: reader.remaining(),
            });
        }
    }
}

/// Extract every image from an MTX file.
///
/// Outputs are named `<base><index>.<ext>` where `<base>` is the file name up
/// to its first `.`, and go next to the input unless
/// [`ExtractOptions::output_dir`] is set.
///
/// # Errors
/// Returns the first error found in the container. Nothing is written in
/// that case.
pub fn extract_file(path: &Path, options: &ExtractOptions) -> Result<ExtractReport> {
    check_input_file(path)?;
    let reader = BufReader::new(File::open(path)?);
    extract_from_reader(reader, path, options)
}

/// Extract from an already opened source. `source` names the outputs and,
/// without an explicit output directory, decides where they go.
///
/// # Errors
/// Returns the first error found in the container. Nothing is written in
/// that case.
pub fn extract_from_reader<R: Read + Seek>(
    reader: R,
    source: &Path,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    let mut reader = ChunkReader::new(reader)?;
    let version = sniff_version(&mut reader)?;

    let plan = match version {
        ContainerVersion::V0 => v0::extract(&mut reader)?,
        ContainerVersion::V1 => v1::extract(&mut reader)?,
        ContainerVersion::V2 => v2::extract(&mut reader)?,
    };

    commit(plan, source, options)
}

/// Write (or, in dry-run mode, only name) the planned outputs
fn commit(plan: ExtractPlan, source: &Path, options: &ExtractOptions) -> Result<ExtractReport> {
    let dir = output_dir_for(source, options.output_dir.as_deref());
    let base = extraction_base_name(source);
    let kind = OutputKind::for_version(plan.version);
    let extension = plan.version.output_extension();

    if !options.dry_run && !plan.outputs.is_empty() && !dir.as_os_str().is_empty() {
        fs::create_dir_all(&dir)?;
    }

    let mut outputs = Vec::with_capacity(plan.outputs.len());
    let mut written = Vec::new();
    for pending in plan.outputs {
        let path = extraction_output_path(&dir, &base, pending.index, extension);
        if options.dry_run {
            info!("Dry run: skipping write of {}", path.display());
        } else if let Err(e) = fs::write(&path, &pending.data) {
            remove_written(&written);
            return Err(e.into());
        } else {
            info!("Wrote {}", path.display());
            written.push(path.clone());
        }
        outputs.push(ExtractedImage {
            path,
            index: pending.index,
            kind,
            dimensions: pending.dimensions,
            size: pending.data.len() as u64,
        });
    }

    Ok(ExtractReport {
        source: source.to_path_buf(),
        version: plan.version,
        outputs,
        warnings: plan.warnings,
        dry_run: options.dry_run,
    })
}

/// Undo the writes of a failed commit
fn remove_written(paths: &[PathBuf]) {
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => debug!("Removed {}", path.display()),
            Err(e) => warn!("Failed to remove {}: {e}", path.display()),
        }
    }
}
