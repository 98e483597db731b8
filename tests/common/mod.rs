#![allow(dead_code)]

use std::path::{Path, PathBuf};

use bsh_extractor::Palette;

pub const HEADER_LEN: usize = 20;
pub const END_OF_ROW: u8 = 0xFE;
pub const END_OF_IMAGE: u8 = 0xFF;

/// Palette where colour `i` is `(i, 255 - i, i / 2)`.
pub fn palette_bytes() -> Vec<u8> {
    let mut data = b"COL\0".to_vec();
    data.resize(HEADER_LEN, 0);
    for i in 0..=255u8 {
        data.extend_from_slice(&[i, 255 - i, i / 2, 0]);
    }
    data
}

pub fn palette() -> Palette {
    Palette::from_bytes(&palette_bytes()).unwrap()
}

pub fn colour(i: u8) -> [u8; 4] {
    [i, 255 - i, i / 2, 255]
}

pub fn record(width: i32, height: i32, stream: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data.extend_from_slice(&[0u8; 8]);
    data.extend_from_slice(stream);
    data
}

/// Container with one offset table entry per record, records laid out back to back.
pub fn container(records: &[Vec<u8>]) -> Vec<u8> {
    let mut data = b"BSH\0".to_vec();
    data.resize(HEADER_LEN, 0);

    let table_len = records.len() * 4;
    let mut relative = table_len;
    for record in records {
        data.extend_from_slice(&(relative as i32).to_le_bytes());
        relative += record.len();
    }
    for record in records {
        data.extend_from_slice(record);
    }
    data
}

/// 2x2 image: row 0 is transparent then colour 7, row 1 is colours 1 and 2.
pub fn small_record() -> Vec<u8> {
    record(2, 2, &[1, 1, 7, END_OF_ROW, 0, 2, 1, 2, END_OF_IMAGE])
}

/// Fresh, empty directory under the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "bsh_extractor_{}_{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn write_file(path: &Path, data: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, data).unwrap();
}
