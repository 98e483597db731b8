use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::LevelFilter;

use crate::bsh_extractor::{ExtractConfig, DEFAULT_OUTPUT_DIR, DEFAULT_PALETTE_PATH};

#[derive(Debug, Parser)]
#[command(name = "bsh_extractor", version, about = "Extract Anno 1602 BSH sprites as PNG images")]
pub struct Cli {
    /// Anno 1602 installation directory
    pub asset_dir: PathBuf,
    /// BSH file, relative to the installation directory
    pub bsh_file: PathBuf,
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,
    /// Palette file, relative to the installation directory
    #[arg(long, default_value = DEFAULT_PALETTE_PATH)]
    pub palette: PathBuf,
    /// Optimise saved PNGs with oxipng
    #[arg(long)]
    pub optimise: bool,
    /// Don't write the JSON manifest
    #[arg(long)]
    pub no_manifest: bool,
    /// Write progress as JSON to this file
    #[arg(long)]
    pub progress_file: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn to_config(&self) -> ExtractConfig {
        ExtractConfig {
            palette_path: self.palette.clone(),
            output_dir: self.output.clone(),
            optimise_png: self.optimise,
            write_manifest: !self.no_manifest,
            progress_file: self.progress_file.clone(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Warn;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
