mod color;
mod interp;

pub use color::{hex_to_linear, parse_hex, srgb_to_linear, ColorError};
pub use interp::{lerp, to_signed_unit};
