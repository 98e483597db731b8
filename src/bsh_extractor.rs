use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use image::RgbaImage;
use log::{info, warn};
use serde::Serialize;

use crate::{
    error::BshError,
    formats::{decode_container, Palette},
    progress::{write_progress, Progress},
};

pub const DEFAULT_PALETTE_PATH: &str = "TOOLGFX/STADTFLD.COL";
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Extraction settings
#[derive(Clone, Debug)]
pub struct ExtractConfig {
    /// Palette location, relative to the asset directory
    pub palette_path: PathBuf,
    pub output_dir: PathBuf,
    /// Run every saved PNG through oxipng
    pub optimise_png: bool,
    /// Write `<container>.json` next to the images
    pub write_manifest: bool,
    pub progress_file: Option<PathBuf>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            palette_path: PathBuf::from(DEFAULT_PALETTE_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            optimise_png: false,
            write_manifest: true,
            progress_file: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ManifestEntry {
    pub file: String,
    pub index: usize,
    pub entry: usize,
    pub offset: u64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize)]
pub struct Manifest {
    pub container: String,
    pub table_entries: usize,
    pub skipped: usize,
    pub images: Vec<ManifestEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub saved: Vec<PathBuf>,
    pub skipped: usize,
    pub manifest: Option<PathBuf>,
}

pub struct BshExtractor {
    asset_dir: PathBuf,
    config: ExtractConfig,
    palette: Palette,
}

impl BshExtractor {
    /// Load the palette from the asset directory. Fails before any container is touched.
    pub fn new<P: AsRef<Path>>(asset_dir: P, config: ExtractConfig) -> Result<Self, BshError> {
        let asset_dir = asset_dir.as_ref().to_path_buf();
        let palette_path = asset_dir.join(&config.palette_path);

        info!("Reading palette {}", palette_path.display());
        let palette_data = fs::read(&palette_path)?;
        let palette = Palette::from_bytes(&palette_data)?;

        Ok(Self::with_palette(asset_dir, config, palette))
    }

    pub fn with_palette<P: AsRef<Path>>(
        asset_dir: P,
        config: ExtractConfig,
        palette: Palette,
    ) -> Self {
        BshExtractor {
            asset_dir: asset_dir.as_ref().to_path_buf(),
            config,
            palette,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract every image of a container (path relative to the asset directory) as
    /// `<name>_<index>.png`.
    ///
    /// If decoding fails part way, the images written so far stay on disk, the manifest records
    /// the failure and the error is returned.
    pub fn extract<P: AsRef<Path>>(&self, container: P) -> Result<ExtractSummary, BshError> {
        let container_path = self.asset_dir.join(container.as_ref());
        if !container_path.is_file() {
            return Err(BshError::ContainerNotFound(container_path));
        }

        let name = container_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "container".to_string());

        let data = fs::read(&container_path)?;
        fs::create_dir_all(&self.config.output_dir)?;

        let mut images = decode_container(&data, &self.palette)?;
        let total = images.index().len();
        info!("{}: {} offset table entries", name, total);

        let mut saved = Vec::new();
        let mut entries = Vec::new();
        let mut failure = None;

        while let Some(result) = images.next() {
            let (index, image) = match result {
                Ok(decoded) => decoded,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            };

            let file_name = format!("{}_{}.png", name, index);
            let path = self.config.output_dir.join(&file_name);
            self.save_png(&image.image, &path)?;

            info!("Saved image: {}", path.display());
            info!("{} bytes remaining", images.remaining_after(image.end));

            entries.push(ManifestEntry {
                file: file_name,
                index,
                entry: image.entry,
                offset: image.offset,
                width: image.width(),
                height: image.height(),
            });
            saved.push(path);

            if let Some(progress_path) = &self.config.progress_file {
                write_progress(
                    progress_path,
                    &Progress {
                        container: &name,
                        current: images.entries_visited(),
                        total,
                        saved: saved.len(),
                        skipped: images.skipped(),
                        status: "extracting",
                    },
                );
            }
        }

        let skipped = images.skipped();
        if skipped > 0 {
            info!("{}: skipped {} entries with invalid size", name, skipped);
        }

        let manifest = if self.config.write_manifest {
            let manifest = Manifest {
                container: name.clone(),
                table_entries: total,
                skipped,
                images: entries,
                error: failure.as_ref().map(|e| e.to_string()),
            };
            Some(self.save_manifest(&manifest, &name)?)
        } else {
            None
        };

        if let Some(progress_path) = &self.config.progress_file {
            write_progress(
                progress_path,
                &Progress {
                    container: &name,
                    current: images.entries_visited(),
                    total,
                    saved: saved.len(),
                    skipped,
                    status: if failure.is_some() { "failed" } else { "done" },
                },
            );
        }

        if let Some(e) = failure {
            warn!(
                "{}: stopped after {} images: {}",
                name,
                saved.len(),
                e
            );
            return Err(e);
        }

        Ok(ExtractSummary {
            saved,
            skipped,
            manifest,
        })
    }

    fn save_manifest(&self, manifest: &Manifest, name: &str) -> Result<PathBuf, BshError> {
        let path = self.config.output_dir.join(format!("{}.json", name));
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, manifest)?;
        Ok(path)
    }

    fn save_png(&self, image: &RgbaImage, path: &Path) -> Result<(), BshError> {
        if !self.config.optimise_png {
            image.save(path)?;
            return Ok(());
        }

        let temp_path = path.with_extension("temp.png");
        image.save(&temp_path)?;

        let mut options = oxipng::Options::from_preset(2);
        options.bit_depth_reduction = true;

        match oxipng::optimize(
            &oxipng::InFile::Path(temp_path.clone()),
            &oxipng::OutFile::Path(Some(path.to_path_buf())),
            &options,
        ) {
            Ok(_) => {
                let _ = fs::remove_file(temp_path);
                Ok(())
            }
            Err(e) => {
                fs::rename(&temp_path, path)?;
                warn!(
                    "oxipng optimisation failed for {}: {}. File saved unoptimised.",
                    path.display(),
                    e
                );
                Ok(())
            }
        }
    }
}
