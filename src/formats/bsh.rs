//! # BSH Sprite Container
//!
//! Anno 1602 stores its sprites in BSH files. After a 20 byte header comes a table of
//! little-endian `i32` offsets, each relative to the end of that header. The table has no
//! explicit length: it ends where the first image begins.
//!
//! Every image record starts with `i32` width, `i32` height and 8 unknown bytes, followed by a
//! run-length stream:
//!
//! - `0xFF` ends the image.
//! - `0xFE` ends the current row.
//! - any other byte `n` is a run of `n` transparent pixels, followed by a count byte `m` and `m`
//!   palette indices for opaque pixels.

use std::io::Cursor;
use std::iter::FusedIterator;

use image::{Rgba, RgbaImage};
use log::debug;

use super::col::Palette;
use crate::binary_utils::{read_i32_le, read_u8, remaining, seek_to, skip};
use crate::error::BshError;

pub const BSH_HEADER_LEN: usize = 20;
pub const RECORD_UNKNOWN_LEN: u64 = 8;

pub const END_OF_IMAGE: u8 = 0xFF;
pub const END_OF_ROW: u8 = 0xFE;

/// Largest width or height accepted for a single record. Real sprites are far smaller; the
/// limit only exists so a garbage record cannot request an absurd allocation.
pub const MAX_IMAGE_DIMENSION: i32 = 8192;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Absolute offsets of every image record in a container, in file order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BshIndex {
    offsets: Vec<i64>,
}

impl BshIndex {
    pub fn from_bytes(data: &[u8]) -> Result<Self, BshError> {
        if data.len() < BSH_HEADER_LEN + 4 {
            return Err(BshError::MalformedContainer(format!(
                "{} bytes is too short for the header and first offset",
                data.len()
            )));
        }

        let mut cursor = Cursor::new(data);
        seek_to(&mut cursor, BSH_HEADER_LEN as u64)?;

        let first_offset = read_i32_le(&mut cursor)? as i64 + BSH_HEADER_LEN as i64;
        let mut offsets = vec![first_offset];

        // An entry belongs to the table only if it ends at or before the first image.
        while cursor.position() as i64 + 4 <= first_offset {
            let position = cursor.position();
            let relative = read_i32_le(&mut cursor).map_err(|_| {
                BshError::MalformedContainer(format!(
                    "offset table truncated at {} (first image at {})",
                    position, first_offset
                ))
            })?;
            offsets.push(relative as i64 + BSH_HEADER_LEN as i64);
        }

        debug!(
            "BSH index: {} entries, first image at {}",
            offsets.len(),
            first_offset
        );
        Ok(BshIndex { offsets })
    }

    pub fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Outcome of decoding one record.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    Image(RgbaImage),
    /// Record with a non-positive dimension. Not an error: such entries are simply absent.
    Skip { width: i32, height: i32 },
}

/// Decode the record at the cursor's position.
///
/// On success the cursor is left just past the end-of-image marker.
pub fn decode_image(cursor: &mut Cursor<&[u8]>, palette: &Palette) -> Result<Decoded, BshError> {
    let width = read_i32_le(cursor).map_err(|_| truncated(cursor))?;
    let height = read_i32_le(cursor).map_err(|_| truncated(cursor))?;

    if width <= 0 || height <= 0 {
        return Ok(Decoded::Skip { width, height });
    }
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(BshError::ImageTooLarge { width, height });
    }

    let mut image = RgbaImage::new(width as u32, height as u32);
    skip(cursor, RECORD_UNKNOWN_LEN).map_err(|_| truncated(cursor))?;

    let mut x = 0u32;
    let mut y = 0u32;

    loop {
        let transparent = read_u8(cursor).map_err(|_| truncated(cursor))?;

        match transparent {
            END_OF_IMAGE => break,
            END_OF_ROW => {
                x = 0;
                y = y.saturating_add(1);
            }
            n => {
                for _ in 0..n {
                    put(&mut image, x, y, TRANSPARENT)?;
                    x += 1;
                }

                let opaque = read_u8(cursor).map_err(|_| truncated(cursor))?;
                for _ in 0..opaque {
                    let index = read_u8(cursor).map_err(|_| truncated(cursor))?;
                    put(&mut image, x, y, palette.lookup(index as usize)?)?;
                    x += 1;
                }
            }
        }
    }

    Ok(Decoded::Image(image))
}

fn put(image: &mut RgbaImage, x: u32, y: u32, pixel: Rgba<u8>) -> Result<(), BshError> {
    if x >= image.width() || y >= image.height() {
        return Err(BshError::RunOutOfBounds {
            x,
            y,
            width: image.width(),
            height: image.height(),
        });
    }
    image.put_pixel(x, y, pixel);
    Ok(())
}

fn truncated(cursor: &Cursor<&[u8]>) -> BshError {
    BshError::TruncatedImageStream {
        offset: cursor.position() as i64,
    }
}

/// A successfully decoded record along with where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct BshImage {
    /// Position of the record in the offset table, counting skipped entries.
    pub entry: usize,
    /// Absolute byte offset of the record.
    pub offset: u64,
    /// Cursor position just after the end-of-image marker.
    pub end: u64,
    pub image: RgbaImage,
}

impl BshImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Lazily decodes every record of a container.
///
/// Yields `(index, image)` where `index` counts only decoded images. The first error is
/// yielded once, after which the iterator is exhausted.
pub struct BshImages<'a> {
    data: &'a [u8],
    palette: &'a Palette,
    index: BshIndex,
    next_entry: usize,
    next_index: usize,
    skipped: usize,
    finished: bool,
}

pub fn decode_container<'a>(
    data: &'a [u8],
    palette: &'a Palette,
) -> Result<BshImages<'a>, BshError> {
    let index = BshIndex::from_bytes(data)?;
    Ok(BshImages {
        data,
        palette,
        index,
        next_entry: 0,
        next_index: 0,
        skipped: 0,
        finished: false,
    })
}

impl BshImages<'_> {
    pub fn index(&self) -> &BshIndex {
        &self.index
    }

    /// Offset table entries visited so far, decoded or skipped.
    pub fn entries_visited(&self) -> usize {
        self.next_entry
    }

    /// Number of entries skipped so far because of non-positive dimensions.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Bytes of the container left after `position`.
    pub fn remaining_after(&self, position: u64) -> u64 {
        (self.data.len() as u64).saturating_sub(position)
    }

    fn decode_entry(&self, entry: usize, offset: i64) -> Result<Option<BshImage>, BshError> {
        if offset < 0 || offset as u64 > self.data.len() as u64 {
            return Err(BshError::TruncatedImageStream { offset });
        }

        let mut cursor = Cursor::new(self.data);
        seek_to(&mut cursor, offset as u64)?;

        match decode_image(&mut cursor, self.palette)? {
            Decoded::Image(image) => {
                debug!(
                    "Entry {} at {}: {}x{}, {} bytes remaining",
                    entry,
                    offset,
                    image.width(),
                    image.height(),
                    remaining(&cursor)
                );
                Ok(Some(BshImage {
                    entry,
                    offset: offset as u64,
                    end: cursor.position(),
                    image,
                }))
            }
            Decoded::Skip { width, height } => {
                debug!(
                    "Skipping entry {} at {}: invalid size {}x{}",
                    entry, offset, width, height
                );
                Ok(None)
            }
        }
    }
}

impl Iterator for BshImages<'_> {
    type Item = Result<(usize, BshImage), BshError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while let Some(&offset) = self.index.offsets().get(self.next_entry) {
            let entry = self.next_entry;
            self.next_entry += 1;

            match self.decode_entry(entry, offset) {
                Ok(Some(image)) => {
                    let index = self.next_index;
                    self.next_index += 1;
                    return Some(Ok((index, image)));
                }
                Ok(None) => self.skipped += 1,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }

        self.finished = true;
        None
    }
}

impl FusedIterator for BshImages<'_> {}
