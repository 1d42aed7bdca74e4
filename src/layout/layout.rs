// Tue Jan 13 2026 - Alex

use crate::layout::{LayoutError, TypeKey, Value};
use crate::memory::{Address, DataSource};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    pub fn is_native(self) -> bool {
        self == Self::native()
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => write!(f, "little-endian"),
            Self::Big => write!(f, "big-endian"),
        }
    }
}

/// A rule for decoding one logical type from a fixed number of bytes.
///
/// Implementations are immutable: `size` is fixed at construction and is
/// always greater than zero.
pub trait Layout: Send + Sync + fmt::Debug {
    fn type_key(&self) -> &TypeKey;

    fn size(&self) -> usize;

    fn alignment(&self) -> usize {
        self.size().min(8)
    }

    fn read(&self, source: &dyn DataSource, addr: Address) -> Result<Value, LayoutError>;
}
