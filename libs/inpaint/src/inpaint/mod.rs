mod telea;
mod types;

pub use telea::TeleaEngine;
pub use types::{InpaintMode, DEFAULT_RADIUS};

use crate::error::InpaintError;
use image::{GrayImage, RgbImage};

/// Fills the masked region of an image from its surroundings.
///
/// `mask` must have the image's dimensions; any non-zero pixel marks a pixel
/// to reconstruct. Implementations must leave unmasked pixels untouched.
pub trait InpaintEngine: Send + Sync {
    fn name(&self) -> &str;

    fn inpaint(
        &self,
        image: &RgbImage,
        mask: &GrayImage,
        radius: u32,
        mode: InpaintMode,
    ) -> Result<RgbImage, InpaintError>;
}
