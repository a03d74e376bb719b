//! CLI command for baking images into MTX containers

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::progress::{PICTURE, batch_bar, print_error, print_output, print_summary, update_bar};
use crate::container::{CreateOptions, create_batch, create_batch_parallel};
use crate::formats::TargetVersion;

pub fn execute(
    images: &[PathBuf],
    mtx_version: i32,
    jpeg_quality: u8,
    output: Option<&Path>,
    parallel: bool,
    quiet: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let options = CreateOptions::new()
        .with_target(TargetVersion::from_selector(mtx_version)?)
        .with_jpeg_quality(jpeg_quality)
        .with_output_dir(output.map(Path::to_path_buf))
        .with_dry_run(dry_run);

    let start = Instant::now();
    let pb = batch_bar(images.len(), "Baking", quiet);
    let result = if parallel {
        create_batch_parallel(images, &options, |p| update_bar(&pb, p))
    } else {
        create_batch(images, &options, |p| update_bar(&pb, p))
    };
    pb.finish_and_clear();

    for outcome in &result.outcomes {
        match &outcome.result {
            Ok(report) => {
                let sizes: Vec<String> = report.images.iter().map(|(w, h)| format!("{w}x{h}")).collect();
                let detail = if sizes.is_empty() {
                    format!("{}, {} bytes", report.version, report.size)
                } else {
                    format!("{}, {}, {} bytes", report.version, sizes.join(" + "), report.size)
                };
                print_output(PICTURE, &report.output, &detail);
            }
            Err(e) => print_error(&outcome.path, e),
        }
    }

    print_summary(result.success_count, result.fail_count, start.elapsed());
    super::finish(result.fail_count, images.len())
}
