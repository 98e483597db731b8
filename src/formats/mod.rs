//! Anno 1602 graphics formats
//!
//! `col` holds the 256-colour palette, `bsh` the sprite container and its run-length images.

pub mod bsh;
pub mod col;

pub use bsh::{decode_container, decode_image, BshImage, BshImages, BshIndex, Decoded};
pub use col::{Palette, Rgb};
