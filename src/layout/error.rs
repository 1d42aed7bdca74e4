// Tue Jan 13 2026 - Alex

use crate::layout::TypeKey;
use crate::memory::MemoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Layout already registered for {0}")]
    DuplicateRegistration(TypeKey),
    #[error("No layout could be resolved for {0}")]
    Unresolved(TypeKey),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: String },
    #[error("Field not found: {0}")]
    FieldNotFound(String),
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),
}
