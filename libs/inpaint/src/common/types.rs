use anyhow::{Context, Result};
use std::path::Path;

use super::utils::file_stem;

const FALLBACK_STEM: &str = "image";

/// One uploaded payload: the client-supplied filename and its raw bytes.
#[derive(Debug, Clone, Default)]
pub struct UploadFile {
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: Option<String>, data: Vec<u8>) -> Self {
        Self { file_name, data }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(Self::new(file_name, data))
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Name used for the archive entry, e.g. `holiday` for `holiday.jpg`.
    pub fn stem(&self) -> &str {
        match self.file_name.as_deref().map(file_stem) {
            Some(stem) if !stem.is_empty() => stem,
            _ => FALLBACK_STEM,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadPair {
    pub image: UploadFile,
    pub mask: UploadFile,
}

impl UploadPair {
    pub fn new(image: UploadFile, mask: UploadFile) -> Self {
        Self { image, mask }
    }
}
