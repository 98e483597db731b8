pub mod binary_utils;
pub mod bsh_extractor;
pub mod cli;
pub mod error;
pub mod formats;
pub mod progress;

use log::LevelFilter;
use std::io::Write;

pub use crate::bsh_extractor::{BshExtractor, ExtractConfig, ExtractSummary};
pub use crate::error::BshError;
pub use crate::formats::{decode_container, BshImage, BshImages, BshIndex, Palette};

/// Log to stderr at `level` for this crate. `RUST_LOG` takes precedence when set.
pub fn init_logging(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_module("bsh_extractor", level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .try_init();
}
