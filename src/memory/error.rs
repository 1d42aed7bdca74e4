// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Read failed at address {0:#x}")]
    ReadFailed(u64),
    #[error("Out of bounds: {len} bytes at {addr:#x}")]
    OutOfBounds { addr: u64, len: usize },
    #[error("Unmapped address {0:#x}")]
    Unmapped(u64),
    #[error("Unterminated string at {addr:#x} (limit {limit} bytes)")]
    UnterminatedString { addr: u64, limit: usize },
    #[error("Invalid UTF-8 string at {0:#x}")]
    InvalidString(u64),
}
