pub mod bake;
pub mod extract;
pub mod info;

use std::path::PathBuf;

use clap::Subcommand;

use crate::container::{DEFAULT_JPEG_QUALITY, find_container_files};

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the images stored in MTX containers
    #[command(alias = "topng")]
    Extract {
        /// MTX files, or directories to search for them
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output directory (defaults to each container's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Process files in parallel
        #[arg(short = 'j', long)]
        parallel: bool,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Bake PNG/JPEG/PVR files into MTX containers
    #[command(alias = "tomtx")]
    Bake {
        /// Image files to bake
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Target MTX version: -1 (pick from extension), 0, 1 or 2
        #[arg(short = 'm', long = "mtx-version", default_value_t = -1, allow_negative_numbers = true)]
        mtx_version: i32,

        /// JPEG quality for color planes (1-100)
        #[arg(
            short = 'q',
            long,
            default_value_t = DEFAULT_JPEG_QUALITY,
            value_parser = clap::value_parser!(u8).range(1..=100)
        )]
        jpeg_quality: u8,

        /// Output directory (defaults to each image's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Process files in parallel
        #[arg(short = 'j', long)]
        parallel: bool,

        /// Suppress progress bar
        #[arg(long)]
        quiet: bool,
    },

    /// Show the headers and layout of MTX containers
    Info {
        /// MTX files, or directories to search for them
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if any input file failed.
    pub fn execute(&self, dry_run: bool) -> anyhow::Result<()> {
        match self {
            Commands::Extract {
                paths,
                output,
                parallel,
                quiet,
            } => extract::execute(paths, output.as_deref(), *parallel, *quiet, dry_run),
            Commands::Bake {
                images,
                mtx_version,
                jpeg_quality,
                output,
                parallel,
                quiet,
            } => bake::execute(
                images,
                *mtx_version,
                *jpeg_quality,
                output.as_deref(),
                *parallel,
                *quiet,
                dry_run,
            ),
            Commands::Info { paths, json } => info::execute(paths, *json),
        }
    }
}

/// Expand directories into the MTX files below them, keeping plain files
fn expand_container_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .flat_map(|path| {
            if path.is_dir() {
                find_container_files(path)
            } else {
                vec![path.clone()]
            }
        })
        .collect()
}

/// Turn a failure count into the command's result
fn finish(fail_count: usize, total: usize) -> anyhow::Result<()> {
    if fail_count > 0 {
        anyhow::bail!("{fail_count} of {total} files failed");
    }
    Ok(())
}
