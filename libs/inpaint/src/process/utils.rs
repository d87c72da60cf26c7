use anyhow::{Context, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};

use crate::archive::ArchiveBuilder;
use crate::common::{UploadFile, UploadPair};
use crate::error::BatchError;
use crate::image_utils::{binarize_mask, decode_luma, decode_rgb, encode_png};
use crate::inpaint::InpaintEngine;

use super::types::{BatchConfig, BatchOutput, ItemOutcome, ItemRecord, PassThroughReason};

/// A single archived result.
#[derive(Debug)]
pub struct ProcessedItem {
    pub file_name: String,
    pub png: Vec<u8>,
    pub outcome: ItemOutcome,
}

/// `cleaned-<index>-<stem>.png`, with `index` counting from 1.
pub fn result_file_name(index: usize, image: &UploadFile) -> String {
    format!("cleaned-{}-{}.png", index, image.stem())
}

pub fn pair_uploads(
    images: Vec<UploadFile>,
    masks: Vec<UploadFile>,
) -> Result<Vec<UploadPair>, BatchError> {
    if images.len() != masks.len() {
        return Err(BatchError::CountMismatch {
            images: images.len(),
            masks: masks.len(),
        });
    }

    Ok(images
        .into_iter()
        .zip(masks)
        .map(|(image, mask)| UploadPair::new(image, mask))
        .collect())
}

/// Runs one pair through decode, inpaint and encode.
///
/// An `Err` means the image itself could not be used and the item is
/// dropped. Mask and engine problems are absorbed as a pass-through.
pub fn process_item(
    index: usize,
    pair: &UploadPair,
    engine: &dyn InpaintEngine,
    config: &BatchConfig,
) -> Result<ProcessedItem> {
    let image = decode_rgb(&pair.image.data)?;
    let (result, outcome) = inpaint_or_pass_through(index, image, &pair.mask, engine, config);

    Ok(ProcessedItem {
        file_name: result_file_name(index, &pair.image),
        png: encode_png(&result)?,
        outcome,
    })
}

fn inpaint_or_pass_through(
    index: usize,
    image: RgbImage,
    mask: &UploadFile,
    engine: &dyn InpaintEngine,
    config: &BatchConfig,
) -> (RgbImage, ItemOutcome) {
    if mask.is_empty() {
        return (image, ItemOutcome::PassedThrough(PassThroughReason::EmptyMask));
    }

    let mask = match decode_luma(&mask.data) {
        Ok(mask) => mask,
        Err(e) => {
            log::debug!("Item {}: {:#}", index, e);
            return (image, ItemOutcome::PassedThrough(PassThroughReason::UnreadableMask));
        }
    };
    let mask = binarize_mask(&mask);

    match engine.inpaint(&image, &mask, config.radius, config.mode) {
        Ok(result) => (result, ItemOutcome::Inpainted),
        Err(e) => {
            log::warn!("Item {}: {} engine failed, keeping original: {}", index, engine.name(), e);
            (image, ItemOutcome::PassedThrough(PassThroughReason::EngineFailed))
        }
    }
}

/// Processes every image/mask pair in order and packs the results into a
/// ZIP archive.
///
/// Only a count mismatch or an archive write failure aborts the batch.
pub fn process_batch(
    images: Vec<UploadFile>,
    masks: Vec<UploadFile>,
    engine: &dyn InpaintEngine,
    config: &BatchConfig,
) -> Result<BatchOutput, BatchError> {
    let pairs = pair_uploads(images, masks)?;
    log::info!(
        "Processing batch of {} pairs with {} (radius {}, {})",
        pairs.len(),
        engine.name(),
        config.radius,
        config.mode
    );

    let mut archive = ArchiveBuilder::new();
    let mut records = Vec::with_capacity(pairs.len());

    for (position, pair) in pairs.iter().enumerate() {
        let index = position + 1;
        match process_item(index, pair, engine, config) {
            Ok(item) => {
                archive.add_entry(&item.file_name, &item.png)?;
                match item.outcome {
                    ItemOutcome::PassedThrough(reason) => {
                        log::info!("Item {}: passed through ({})", index, reason)
                    }
                    _ => log::debug!("Item {}: {:?}", index, item.outcome),
                }
                records.push(ItemRecord {
                    index,
                    file_name: Some(item.file_name),
                    outcome: item.outcome,
                });
            }
            Err(e) => {
                log::warn!("Item {}: dropped: {:#}", index, e);
                records.push(ItemRecord {
                    index,
                    file_name: None,
                    outcome: ItemOutcome::Dropped,
                });
            }
        }
    }

    log::info!("Archived {} of {} items", archive.len(), pairs.len());

    Ok(BatchOutput {
        archive: archive.finish()?,
        records,
    })
}

pub fn load_uploads(paths: &[PathBuf]) -> Result<Vec<UploadFile>> {
    paths.iter().map(|path| UploadFile::from_path(path)).collect()
}

/// Runs a batch from files on disk and writes the archive to `output`.
///
/// Nothing is written when the batch is rejected. An empty mask file keeps
/// its image unchanged.
pub fn process_paths(
    images: &[PathBuf],
    masks: &[PathBuf],
    output: &Path,
    engine: &dyn InpaintEngine,
    config: &BatchConfig,
) -> Result<BatchOutput> {
    let images = load_uploads(images)?;
    let masks = load_uploads(masks)?;

    let batch = process_batch(images, masks, engine, config)?;

    std::fs::write(output, &batch.archive)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!(
        "Wrote {} of {} results to {}",
        batch.entry_count(),
        batch.records.len(),
        output.display()
    );
    Ok(batch)
}
