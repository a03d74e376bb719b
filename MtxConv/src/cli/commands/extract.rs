//! CLI command for MTX extraction

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::progress::{
    PACKAGE, batch_bar, print_error, print_output, print_summary, print_warning, update_bar,
};
use crate::container::{ExtractOptions, extract_batch, extract_batch_parallel};

pub fn execute(
    paths: &[PathBuf],
    output: Option<&Path>,
    parallel: bool,
    quiet: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let files = super::expand_container_paths(paths);
    if files.is_empty() {
        println!("No MTX files found");
        return Ok(());
    }

    let options = ExtractOptions::new()
        .with_output_dir(output.map(Path::to_path_buf))
        .with_dry_run(dry_run);

    let start = Instant::now();
    let pb = batch_bar(files.len(), "Extracting", quiet);
    let result = if parallel {
        extract_batch_parallel(&files, &options, |p| update_bar(&pb, p))
    } else {
        extract_batch(&files, &options, |p| update_bar(&pb, p))
    };
    pb.finish_and_clear();

    for outcome in &result.outcomes {
        match &outcome.result {
            Ok(report) => {
                println!("{} ({})", outcome.path.display(), report.version);
                for image in &report.outputs {
                    let detail = match image.dimensions {
                        Some((w, h)) => format!("{w}x{h}, {} bytes", image.size),
                        None => format!("{} bytes", image.size),
                    };
                    print_output(PACKAGE, &image.path, &detail);
                }
                for warning in &report.warnings {
                    print_warning(&outcome.path, &warning.to_string());
                }
            }
            Err(e) => print_error(&outcome.path, e),
        }
    }

    print_summary(result.success_count, result.fail_count, start.elapsed());
    super::finish(result.fail_count, files.len())
}
