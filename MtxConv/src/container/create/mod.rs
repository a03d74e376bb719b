//! Container creation ("baking")
//!
//! Validation of the input extension, target version and JPEG quality
//! happens before the input is touched. Encoding then runs fully in memory,
//! and the container is written in one go unless the run is a dry run.

mod v0;
mod v1;
mod v2;

use std::fs;
use std::path::Path;

use image::DynamicImage;
use tracing::info;

use super::paths::{CONTAINER_EXTENSION, creation_output_path, lowercase_extension};
use super::types::{CreateReport, EncodedContainer};
use super::{CreateOptions, check_input_file};
use crate::converter::{decode_input, probe_input_dimensions};
use crate::error::{Error, Result};
use crate::formats::mtx::{ContainerVersion, check_image_bounds};

/// Decide which version `input` bakes into under `options`.
///
/// `.jpg`/`.jpeg` default to V0 and `.png` to V1; both may also target the
/// other of the two. `.pvr` bakes into V2 only. Matching ignores case.
///
/// # Errors
/// Returns an [`InvalidInputFormat`](crate::ErrorKind::InvalidInputFormat)
/// error for `.mtx` inputs, unknown extensions, illegal extension/target
/// combinations and JPEG qualities outside 1..=100.
pub fn resolve_target_version(input: &Path, options: &CreateOptions) -> Result<ContainerVersion> {
    check_quality(options.jpeg_quality)?;

    let extension = lowercase_extension(input);
    let (implied, format) = match extension.as_str() {
        CONTAINER_EXTENSION => {
            return Err(Error::AlreadyContainer {
                path: input.to_path_buf(),
            });
        }
        "jpg" | "jpeg" => (ContainerVersion::V0, "JPEG"),
        "png" => (ContainerVersion::V1, "PNG"),
        "pvr" => (ContainerVersion::V2, "PVR"),
        _ => return Err(Error::UnsupportedInputFormat { extension }),
    };

    let version = options.target.resolve(implied);
    match (implied, version) {
        (ContainerVersion::V2, ContainerVersion::V0 | ContainerVersion::V1) => {
            Err(Error::IncompatibleTarget {
                format,
                allowed: "2",
            })
        }
        (ContainerVersion::V0 | ContainerVersion::V1, ContainerVersion::V2) => {
            Err(Error::IncompatibleTarget {
                format,
                allowed: "0 or 1",
            })
        }
        _ => Ok(version),
    }
}

/// Bake an image file into a container.
///
/// The container is written to `<input file name>.mtx` beside the input, or
/// into [`CreateOptions::output_dir`].
///
/// # Errors
/// Returns an error if validation, decoding, encoding or writing fails. No
/// file is created in that case.
pub fn create_file(input: &Path, options: &CreateOptions) -> Result<CreateReport> {
    let version = resolve_target_version(input, options)?;
    check_input_file(input)?;
    let data = fs::read(input)?;

    let encoded = create_from_bytes(&data, version, options.jpeg_quality)?;
    let output = creation_output_path(input, options.output_dir.as_deref());

    if options.dry_run {
        info!("Dry run: skipping creation of {}", output.display());
    } else {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output, &encoded.bytes)?;
        info!("Wrote {} ({version}, {} bytes)", output.display(), encoded.bytes.len());
    }

    Ok(CreateReport {
        source: input.to_path_buf(),
        output,
        version,
        size: encoded.bytes.len() as u64,
        images: encoded.images,
        dry_run: options.dry_run,
    })
}

/// Encode the contents of an input file into a container of `version`.
///
/// V0 and V1 decode `data` as an image; V2 wraps it verbatim.
///
/// # Errors
/// Returns an error if the quality is out of range or the image cannot be
/// decoded, is larger than 4096 pixels on an axis, or fails to encode.
pub fn create_from_bytes(data: &[u8], version: ContainerVersion, jpeg_quality: u8) -> Result<EncodedContainer> {
    check_quality(jpeg_quality)?;
    match version {
        ContainerVersion::V0 => v0::encode(data, jpeg_quality),
        ContainerVersion::V1 => v1::encode(data, jpeg_quality),
        ContainerVersion::V2 => v2::encode(data),
    }
}

/// Decode an input image, rejecting oversized ones from the header alone
fn decode_bounded_input(data: &[u8]) -> Result<DynamicImage> {
    let (width, height) = probe_input_dimensions(data)?;
    check_image_bounds(width, height)?;
    decode_input(data)
}

fn check_quality(quality: u8) -> Result<()> {
    if (1..=100).contains(&quality) {
        Ok(())
    } else {
        Err(Error::InvalidJpegQuality(quality))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::formats::mtx::TargetVersion;
    use tempfile::TempDir;

    fn target(version: ContainerVersion) -> CreateOptions {
        CreateOptions::new().with_target(TargetVersion::Exact(version))
    }

    #[test]
    fn test_auto_target() {
        let options = CreateOptions::new();
        let resolve = |name: &str| resolve_target_version(Path::new(name), &options).unwrap();
        assert_eq!(resolve("a.jpg"), ContainerVersion::V0);
        assert_eq!(resolve("a.JPEG"), ContainerVersion::V0);
        assert_eq!(resolve("a.png"), ContainerVersion::V1);
        assert_eq!(resolve("a.pvr"), ContainerVersion::V2);
    }

    #[test]
    fn test_explicit_targets() {
        assert_eq!(
            resolve_target_version(Path::new("a.png"), &target(ContainerVersion::V0)).unwrap(),
            ContainerVersion::V0
        );
        assert_eq!(
            resolve_target_version(Path::new("a.jpg"), &target(ContainerVersion::V1)).unwrap(),
            ContainerVersion::V1
        );
    }

    #[test]
    fn test_illegal_combinations() {
        for (name, version) in [
            ("a.pvr", ContainerVersion::V0),
            ("a.pvr", ContainerVersion::V1),
            ("a.png", ContainerVersion::V2),
            ("a.jpg", ContainerVersion::V2),
        ] {
            let err = resolve_target_version(Path::new(name), &target(version)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInputFormat, "{name} -> {version}");
        }
    }

    #[test]
    fn test_rejected_inputs() {
        let options = CreateOptions::new();
        for name in ["a.mtx", "a.MTX", "a.bmp", "noext"] {
            let err = resolve_target_version(Path::new(name), &options).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInputFormat);
        }
        let err = resolve_target_version(Path::new("a.png"), &options.clone().with_jpeg_quality(0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidJpegQuality(0)));
    }

    #[test]
    fn test_validation_precedes_io() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.pvr");
        let err = create_file(&missing, &target(ContainerVersion::V1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInputFormat);
    }

    #[test]
    fn test_dry_run_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("tex.pvr");
        fs::write(&input, vec![0u8; 80]).unwrap();

        let report = create_file(&input, &CreateOptions::new().with_dry_run(true)).unwrap();
        assert!(report.dry_run);
        assert_eq!(report.output, temp.path().join("tex.pvr.mtx"));
        assert_eq!(report.size, 86);
        assert!(!report.output.exists());
    }
}
