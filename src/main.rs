use std::process::ExitCode;

use bsh_extractor::{cli::Cli, init_logging, BshError, BshExtractor};
use clap::Parser;
use log::{error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    info!("Asset dir: {:?}", &cli.asset_dir);

    let extractor = match BshExtractor::new(&cli.asset_dir, cli.to_config()) {
        Ok(extractor) => extractor,
        Err(e) => {
            error!("Failed to read palette: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match extractor.extract(&cli.bsh_file) {
        Ok(summary) => {
            info!(
                "Processing complete! {} images saved, {} entries skipped",
                summary.saved.len(),
                summary.skipped
            );
            ExitCode::SUCCESS
        }
        Err(BshError::ContainerNotFound(path)) => {
            error!("File not found: {}", path.display());
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Error extracting {}: {}", cli.bsh_file.display(), e);
            ExitCode::FAILURE
        }
    }
}
