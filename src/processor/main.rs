use anyhow::Result;
use clap::Parser;
use inpaint::common::init_logger;
use inpaint::inpaint::{InpaintMode, TeleaEngine, DEFAULT_RADIUS};
use inpaint::process::{process_paths, BatchConfig, ItemOutcome};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "A CLI tool to inpaint image/mask pairs into a zip archive", long_about = None)]
struct Cli {
    #[arg(
        long = "image",
        required = true,
        help = "input image (png, jpeg, gif, webp, tiff, bmp, etc); repeat for a batch"
    )]
    images: Vec<PathBuf>,
    #[arg(
        long = "mask",
        help = "mask for the image at the same position; an empty file keeps the image as is"
    )]
    masks: Vec<PathBuf>,
    #[arg(long, default_value = "inpaint_results.zip", help = "archive to write")]
    output: PathBuf,
    #[arg(long, default_value_t = DEFAULT_RADIUS, help = "neighbourhood radius used to fill masked pixels")]
    radius: u32,
    #[arg(long, default_value_t = InpaintMode::FastMarching, help = "fill algorithm")]
    mode: InpaintMode,
}

fn main() -> Result<()> {
    init_logger(env!("CARGO_CRATE_NAME"));
    let cli = Cli::parse();

    let config = BatchConfig::new(cli.radius, cli.mode);
    let output = process_paths(&cli.images, &cli.masks, &cli.output, &TeleaEngine::new(), &config)?;

    for record in &output.records {
        match (&record.outcome, &record.file_name) {
            (ItemOutcome::Dropped, _) => {
                log::warn!("{}: dropped, image could not be decoded", record.index)
            }
            (ItemOutcome::PassedThrough(reason), Some(name)) => {
                log::info!("{}: {} (unchanged, {})", record.index, name, reason)
            }
            (_, Some(name)) => log::info!("{}: {}", record.index, name),
            (_, None) => {}
        }
    }

    Ok(())
}
