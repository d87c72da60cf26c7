use serde::{Deserialize, Serialize};

use crate::inpaint::{InpaintMode, DEFAULT_RADIUS};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchConfig {
    pub radius: u32,
    pub mode: InpaintMode,
}

impl BatchConfig {
    pub fn new(radius: u32, mode: InpaintMode) -> Self {
        Self { radius, mode }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            mode: InpaintMode::FastMarching,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassThroughReason {
    EmptyMask,
    UnreadableMask,
    EngineFailed,
}

impl std::fmt::Display for PassThroughReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PassThroughReason::EmptyMask => write!(f, "empty mask"),
            PassThroughReason::UnreadableMask => write!(f, "unreadable mask"),
            PassThroughReason::EngineFailed => write!(f, "inpainting failed"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemOutcome {
    Inpainted,
    PassedThrough(PassThroughReason),
    Dropped,
}

/// What happened to the pair at `index` (1-based). `file_name` is `None`
/// for dropped items since they never reach the archive.
#[derive(Clone, Debug)]
pub struct ItemRecord {
    pub index: usize,
    pub file_name: Option<String>,
    pub outcome: ItemOutcome,
}

#[derive(Debug)]
pub struct BatchOutput {
    pub archive: Vec<u8>,
    pub records: Vec<ItemRecord>,
}

impl BatchOutput {
    pub fn entry_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.outcome != ItemOutcome::Dropped)
            .count()
    }
}
