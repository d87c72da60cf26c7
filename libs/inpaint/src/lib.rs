pub mod archive;
pub mod common;
pub mod error;
pub mod image_utils;
pub mod inpaint;
pub mod process;
pub mod server;

pub use error::{BatchError, InpaintError};
