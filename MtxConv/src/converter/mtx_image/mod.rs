//! Color plane codec and alpha compositing for MTX images

mod codec;
mod compositor;

pub use codec::{
    ColorFormat, decode_color, decode_input, encode_jpeg, encode_png, half_dimensions, half_size,
    probe_dimensions, probe_input_dimensions, sniff_color_format,
};
pub use compositor::{alpha_plane, composite, make_opaque, split};
