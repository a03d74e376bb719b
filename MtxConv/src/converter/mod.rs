//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Image conversion utilities
//!
//! The color planes inside MTX containers are ordinary JPEG/PNG streams.
//! This module wraps the `image` crate for decoding and encoding them, and
//! merges/splits the separately stored alpha planes.

pub mod mtx_image;

pub use mtx_image::{
    ColorFormat, alpha_plane, composite, decode_color, decode_input, encode_jpeg, encode_png,
    half_dimensions, half_size, make_opaque, probe_dimensions, probe_input_dimensions,
    sniff_color_format, split,
};
