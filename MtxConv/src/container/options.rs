//! Options for extraction and creation
//!
//! Everything a conversion needs is passed in explicitly; there is no
//! process-wide encoder state.

use std::path::PathBuf;

use crate::formats::mtx::TargetVersion;

/// JPEG quality used when none is given (estimated from game files)
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Options for extracting images from a container
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Directory to write extracted images to.
    /// If None, images are written next to the container.
    pub output_dir: Option<PathBuf>,

    /// Run every step but skip writing files
    pub dry_run: bool,
}

impl ExtractOptions {
    /// Default options: output next to the input, files written.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }

    /// Enable or disable dry-run mode
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Options for baking an image into a container
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Container version to produce
    pub target: TargetVersion,

    /// JPEG quality for color planes (1-100)
    pub jpeg_quality: u8,

    /// Directory to write the container to.
    /// If None, it is written next to the input.
    pub output_dir: Option<PathBuf>,

    /// Run every step but skip writing the container
    pub dry_run: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            target: TargetVersion::Auto,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            output_dir: None,
            dry_run: false,
        }
    }
}

impl CreateOptions {
    /// Default options: auto-selected version, quality 90.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target version
    #[must_use]
    pub fn with_target(mut self, target: TargetVersion) -> Self {
        self.target = target;
        self
    }

    /// Set the JPEG quality
    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Set the output directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }

    /// Enable or disable dry-run mode
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
