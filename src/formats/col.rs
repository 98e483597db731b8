//! # COL Palette
//!
//! Anno 1602 ships its 256-colour palettes as `.COL` files. A 20 byte header is followed by
//! 256 records of four bytes each: red, green, blue and one padding byte. Channel values are
//! stored at full 8-bit precision, so no scaling is applied.

use std::io::Cursor;

use image::Rgba;
use log::debug;

use crate::binary_utils::{read_u8, skip};
use crate::error::BshError;

pub const COL_HEADER_LEN: usize = 20;
pub const COL_COLOUR_COUNT: usize = 256;
pub const COL_RECORD_LEN: usize = 4;
pub const COL_MIN_LEN: usize = COL_HEADER_LEN + COL_COLOUR_COUNT * COL_RECORD_LEN;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colours: [Rgb; COL_COLOUR_COUNT],
}

impl Palette {
    pub fn from_bytes(data: &[u8]) -> Result<Self, BshError> {
        if data.len() < COL_MIN_LEN {
            return Err(BshError::MalformedPalette {
                len: data.len(),
                expected: COL_MIN_LEN,
            });
        }

        let mut cursor = Cursor::new(data);
        skip(&mut cursor, COL_HEADER_LEN as u64)?;

        let mut colours = [Rgb::default(); COL_COLOUR_COUNT];
        for col in &mut colours {
            *col = Rgb {
                r: read_u8(&mut cursor)?,
                g: read_u8(&mut cursor)?,
                b: read_u8(&mut cursor)?,
            };
            // Padding byte
            let _ = read_u8(&mut cursor)?;
        }

        debug!("Parsed {} palette colours", colours.len());
        Ok(Palette { colours })
    }

    /// Resolve a palette index to an opaque colour.
    pub fn lookup(&self, index: usize) -> Result<Rgba<u8>, BshError> {
        let Rgb { r, g, b } = self
            .colours
            .get(index)
            .copied()
            .ok_or(BshError::PaletteIndexOutOfRange(index))?;
        Ok(Rgba([r, g, b, 255]))
    }

    pub fn colours(&self) -> &[Rgb] {
        &self.colours
    }
}
