//! CLI command for container inspection

use std::path::PathBuf;

use crate::cli::progress::print_error;
use crate::container::{ContainerInfo, inspect_file};
use crate::formats::FileHeader;

/// Show info about MTX containers
pub fn execute(paths: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let files = super::expand_container_paths(paths);
    let mut infos = Vec::new();
    let mut fail_count = 0;

    for path in &files {
        match inspect_file(path) {
            Ok(info) => infos.push(info),
            Err(e) => {
                print_error(path, &e);
                fail_count += 1;
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
    } else {
        for info in &infos {
            print_info(info);
        }
    }

    super::finish(fail_count, files.len())
}

fn print_info(info: &ContainerInfo) {
    println!("MTX Information: {}", info.path.display());
    println!();
    println!("Version: {}", info.version());
    println!("File size: {} bytes", info.file_size);

    match &info.header {
        FileHeader::V0(header) | FileHeader::V1(header) => {
            println!("Declared lengths: {} + {}", header.length_first, header.length_second);
        }
        FileHeader::V2(header) => println!("Header value: {}", header.unknown),
    }

    if let Some(pvr) = &info.pvr {
        println!("PVR: {}x{}", pvr.width, pvr.height);
        println!("  Mipmaps: {}", pvr.mipmap_count);
        println!("  Pixel format flags: {:#010x}", pvr.pixel_format_flags);
        println!("  Bit count: {}", pvr.bit_count);
        println!("  Surfaces: {}", pvr.num_surfaces);
    }

    println!("Images:");
    for image in &info.images {
        let dims = image
            .dimensions
            .map(|(w, h)| format!("{w}x{h}"))
            .unwrap_or_else(|| "?".to_string());
        let format = image
            .color_format
            .map(|f| format!("{f:?}"))
            .unwrap_or_else(|| "raw".to_string());
        let alpha = image
            .alpha_len
            .map(|len| format!(", alpha {len} bytes"))
            .unwrap_or_default();
        println!(
            "  {:>2}  @{:<8} {:>9}  {format} {} bytes{alpha}",
            image.index, image.offset, dims, image.color_len
        );
    }

    if info.trailing_bytes > 0 {
        println!("Trailing data: {} bytes", info.trailing_bytes);
    }
    println!();
}
