use thiserror::Error;

/// Request-level failures of a batch. Item-level problems never show up here.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("images and masks count mismatch")]
    CountMismatch { images: usize, masks: usize },

    #[error("failed to write archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to write archive entry: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum InpaintError {
    #[error(
        "mask is {mask_width}x{mask_height} but image is {image_width}x{image_height}"
    )]
    DimensionMismatch {
        image_width: u32,
        image_height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    #[error("inpaint radius must be at least 1")]
    InvalidRadius,
}
