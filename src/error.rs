use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BshError {
    #[error("Palette data too short: {len} bytes, expected at least {expected}")]
    MalformedPalette { len: usize, expected: usize },
    #[error("Malformed BSH container: {0}")]
    MalformedContainer(String),
    #[error("Palette index {0} out of range (0-255)")]
    PaletteIndexOutOfRange(usize),
    #[error("Image stream truncated at offset {offset} before end marker")]
    TruncatedImageStream { offset: i64 },
    #[error("Image record too large: {width}x{height}")]
    ImageTooLarge { width: i32, height: i32 },
    #[error("Pixel run wrote outside the image at ({x}, {y}) for a {width}x{height} image")]
    RunOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("Container file not found: {}", .0.display())]
    ContainerNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
