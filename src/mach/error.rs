// Fri Jan 16 2026 - Alex

use crate::layout::LayoutError;
use crate::memory::MemoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MachError {
    #[error("Format error: {0}")]
    Format(String),
    #[error("Format error: no dynamic linker image found ({segments} segments scanned)")]
    DylinkerNotFound { segments: usize },
    #[error("Symbol not found: {0}")]
    MissingSymbol(String),
    #[error("Unsupported dyld_all_image_infos version {0}")]
    UnsupportedVersion(u32),
    #[error("Invalid config: {0}")]
    Config(String),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),
}
