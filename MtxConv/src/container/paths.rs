//! Output naming conventions

use std::path::{Path, PathBuf};

/// Extension appended to baked containers
pub const CONTAINER_EXTENSION: &str = "mtx";

/// Base name for extracted files: the file name up to its first `.`.
///
/// `ui_logo.v2.mtx` becomes `ui_logo`. A name starting with `.` keeps the
/// whole file name so hidden files still produce something usable.
#[must_use]
pub fn extraction_base_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}

/// `<dir>/<base><index>.<extension>`
#[must_use]
pub fn extraction_output_path(dir: &Path, base: &str, index: usize, extension: &str) -> PathBuf {
    dir.join(format!("{base}{index}.{extension}"))
}

/// `<input file name>.mtx`, beside the input unless `output_dir` is given
#[must_use]
pub fn creation_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let mut name = input.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(CONTAINER_EXTENSION);

    let dir = output_dir.or_else(|| input.parent()).unwrap_or(Path::new(""));
    dir.join(name)
}

/// Directory extracted files go to
pub(crate) fn output_dir_for(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    output_dir
        .or_else(|| input.parent())
        .unwrap_or(Path::new(""))
        .to_path_buf()
}

/// Lowercased extension, empty when there is none
pub(crate) fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}
