//! Batch container operations
//!
//! Every file is processed in isolation: a failure is recorded in its
//! [`FileOutcome`] and the batch moves on. Outcomes always come back in
//! input order, including from the parallel variants.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::warn;
use walkdir::WalkDir;

use super::paths::{
    CONTAINER_EXTENSION, creation_output_path, extraction_base_name, output_dir_for,
};
use super::types::{CreateReport, ExtractReport};
use super::{CreateOptions, ExtractOptions, create_file, extract_file};
use crate::error::Result;

/// Progress of a batch, reported once per file before it is processed
#[derive(Debug, Clone)]
pub struct BatchProgress<'a> {
    /// 1-based number of the file being started
    pub current: usize,
    /// Number of files in the batch
    pub total: usize,
    /// The file being started
    pub path: &'a Path,
}

/// Result for a single file
#[derive(Debug)]
pub struct FileOutcome<T> {
    /// Input path
    pub path: PathBuf,
    /// Report or error
    pub result: Result<T>,
}

/// Result of a batch operation
#[derive(Debug)]
pub struct BatchResult<T> {
    /// Number of successful operations
    pub success_count: usize,
    /// Number of failed operations
    pub fail_count: usize,
    /// One outcome per input, in input order
    pub outcomes: Vec<FileOutcome<T>>,
}

impl<T> BatchResult<T> {
    fn from_outcomes(outcomes: Vec<FileOutcome<T>>) -> Self {
        let success_count = outcomes.iter().filter(|o| o.result.is_ok()).count();
        Self {
            success_count,
            fail_count: outcomes.len() - success_count,
            outcomes,
        }
    }

    /// Whether every file succeeded
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.fail_count == 0
    }
}

/// Find all .mtx files in a directory recursively
///
/// # Returns
/// A sorted list of paths to .mtx files found in the directory tree.
pub fn find_container_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.path().is_file()
                && e.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(CONTAINER_EXTENSION))
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}

/// Extract containers one after another
pub fn extract_batch<F>(paths: &[PathBuf], options: &ExtractOptions, progress: F) -> BatchResult<ExtractReport>
where
    F: Fn(&BatchProgress),
{
    run_sequential(paths, progress, |path| extract_file(path, options))
}

/// Extract containers on the rayon pool.
///
/// Containers sharing an output base name in the same directory, such as
/// `a.v1.mtx` and `a.v2.mtx`, write to the same paths. Such a batch runs
/// sequentially instead, and the later container's outputs win.
pub fn extract_batch_parallel<F>(
    paths: &[PathBuf],
    options: &ExtractOptions,
    progress: F,
) -> BatchResult<ExtractReport>
where
    F: Fn(&BatchProgress) + Send + Sync,
{
    let shared = has_shared_output(paths, |path| {
        output_dir_for(path, options.output_dir.as_deref()).join(extraction_base_name(path))
    });
    if shared {
        warn!("Containers share output names, extracting sequentially");
        return extract_batch(paths, options, progress);
    }
    run_parallel(paths, progress, |path| extract_file(path, options))
}

/// Bake images one after another
pub fn create_batch<F>(paths: &[PathBuf], options: &CreateOptions, progress: F) -> BatchResult<CreateReport>
where
    F: Fn(&BatchProgress),
{
    run_sequential(paths, progress, |path| create_file(path, options))
}

/// Bake images on the rayon pool.
///
/// Inputs with the same file name baked into one output directory run
/// sequentially instead, as in [`extract_batch_parallel`].
pub fn create_batch_parallel<F>(
    paths: &[PathBuf],
    options: &CreateOptions,
    progress: F,
) -> BatchResult<CreateReport>
where
    F: Fn(&BatchProgress) + Send + Sync,
{
    if has_shared_output(paths, |path| creation_output_path(path, options.output_dir.as_deref())) {
        warn!("Inputs share an output container, baking sequentially");
        return create_batch(paths, options, progress);
    }
    run_parallel(paths, progress, |path| create_file(path, options))
}

/// Whether two distinct inputs map to the same output key
fn has_shared_output<K>(paths: &[PathBuf], key: K) -> bool
where
    K: Fn(&Path) -> PathBuf,
{
    let mut seen = HashSet::new();
    let mut inputs = HashSet::new();
    paths
        .iter()
        .filter(|path| inputs.insert(path.as_path()))
        .any(|path| !seen.insert(key(path)))
}

fn run_sequential<T, F, Op>(paths: &[PathBuf], progress: F, op: Op) -> BatchResult<T>
where
    F: Fn(&BatchProgress),
    Op: Fn(&Path) -> Result<T>,
{
    let total = paths.len();
    let outcomes = paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            progress(&BatchProgress {
                current: i + 1,
                total,
                path,
            });
            FileOutcome {
                path: path.clone(),
                result: op(path),
            }
        })
        .collect();

    BatchResult::from_outcomes(outcomes)
}

fn run_parallel<T, F, Op>(paths: &[PathBuf], progress: F, op: Op) -> BatchResult<T>
where
    T: Send,
    F: Fn(&BatchProgress) + Send + Sync,
    Op: Fn(&Path) -> Result<T> + Send + Sync,
{
    let processed = AtomicUsize::new(0);
    let total = paths.len();

    // par_iter().map().collect() keeps input order
    let outcomes = paths
        .par_iter()
        .map(|path| {
            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&BatchProgress {
                current,
                total,
                path,
            });
            FileOutcome {
                path: path.clone(),
                result: op(path),
            }
        })
        .collect();

    BatchResult::from_outcomes(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn v0_container(first: &[u8], second: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&(first.len() as u32).to_le_bytes());
        data.extend_from_slice(&(second.len() as u32).to_le_bytes());
        data.extend_from_slice(first);
        data.extend_from_slice(second);
        data
    }

    #[test]
    fn test_find_container_files() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("ui").join("icons");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("b.mtx"), b"").unwrap();
        fs::write(temp.path().join("a.MTX"), b"").unwrap();
        fs::write(temp.path().join("c.png"), b"").unwrap();

        let found = find_container_files(temp.path());
        assert_eq!(found, vec![temp.path().join("a.MTX"), nested.join("b.mtx")]);
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good.mtx");
        let bad = temp.path().join("bad.mtx");
        fs::write(&good, v0_container(b"one", b"two")).unwrap();
        fs::write(&bad, [9u8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();

        let seen = Mutex::new(Vec::new());
        let paths = vec![bad.clone(), good.clone()];
        let result = extract_batch(&paths, &ExtractOptions::new(), |p| {
            seen.lock().unwrap().push(p.current);
        });

        assert_eq!(result.success_count, 1);
        assert_eq!(result.fail_count, 1);
        assert!(!result.all_succeeded());
        assert_eq!(result.outcomes[0].path, bad);
        let err = result.outcomes[0].result.as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedVersion);
        assert!(temp.path().join("good1.jpg").exists());
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_parallel_keeps_order() {
        let temp = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..8)
            .map(|i| {
                let path = temp.path().join(format!("tex{i}.mtx"));
                fs::write(&path, v0_container(&[i as u8; 3], b"")).unwrap();
                path
            })
            .collect();

        let options = ExtractOptions::new().with_dry_run(true);
        let result = extract_batch_parallel(&paths, &options, |_| {});

        assert!(result.all_succeeded());
        for (outcome, path) in result.outcomes.iter().zip(&paths) {
            assert_eq!(&outcome.path, path);
        }
    }

    #[test]
    fn test_shared_output_names() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("a.v1.mtx");
        let second = temp.path().join("a.v2.mtx");
        fs::write(&first, v0_container(b"one", b"")).unwrap();
        fs::write(&second, v0_container(b"two", b"")).unwrap();

        let key = |path: &Path| path.parent().unwrap().join(extraction_base_name(path));
        let paths = vec![first.clone(), second.clone()];
        assert!(has_shared_output(&paths, key));
        assert!(!has_shared_output(&[first.clone(), temp.path().join("b.mtx")], key));
        assert!(!has_shared_output(&[first.clone(), first.clone()], key));

        let result = extract_batch_parallel(&paths, &ExtractOptions::new(), |_| {});
        assert!(result.all_succeeded());
        assert_eq!(fs::read(temp.path().join("a1.jpg")).unwrap(), b"two");
    }
}
