//! CLI progress display utilities
//!
//! Batch commands show one bar across all input files, then a per-file
//! listing and a summary line.

use std::path::Path;
use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

use crate::container::BatchProgress;

/// Package - for extraction
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
/// Picture - for baked textures
pub static PICTURE: Emoji<'_, '_> = Emoji("🖼️  ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

/// Progress bar style for batch progress
///
/// Format: `Extracting [████████░░░░░░░░] 5/10`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .expect("valid template")
}

/// A bar over `total` files, hidden when `quiet`
#[must_use]
pub fn batch_bar(total: usize, msg: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(bar_style());
    pb.set_message(msg.to_string());
    pb
}

/// Move the bar to the file a batch is about to process
pub fn update_bar(pb: &ProgressBar, progress: &BatchProgress) {
    pb.set_position(progress.current.saturating_sub(1) as u64);
    if let Some(name) = progress.path.file_name() {
        pb.set_message(name.to_string_lossy().into_owned());
    }
}

/// Print one produced file: `  📦 out/logo1.png`
pub fn print_output(emoji: Emoji, path: &Path, detail: &str) {
    println!("  {emoji}{} {}", path.display(), style(detail).dim());
}

/// Print a non-fatal warning for a file
pub fn print_warning(path: &Path, warning: &str) {
    println!("  {} {}: {warning}", style("warning").yellow().bold(), path.display());
}

/// Print a per-file error
pub fn print_error(path: &Path, error: &dyn std::fmt::Display) {
    eprintln!("{} {}: {error}", style("error").red().bold(), path.display());
}

/// Print the batch summary: `✨ 3 succeeded, 1 failed in 2s`
pub fn print_summary(success: usize, failed: usize, elapsed: Duration) {
    let failed_text = if failed > 0 {
        style(format!("{failed} failed")).red().to_string()
    } else {
        format!("{failed} failed")
    };
    println!(
        "{SPARKLE}{success} succeeded, {failed_text} in {}",
        HumanDuration(elapsed)
    );
}
