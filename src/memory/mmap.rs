// Tue Jan 13 2026 - Alex

use crate::memory::buffer::slice_at;
use crate::memory::{Address, DataSource, MemoryError};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// File-backed store; file offset 0 is address 0.
pub struct MmapSource {
    mmap: Arc<Mmap>,
}

impl MmapSource {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MemoryError> {
        let file = File::open(path)?;
        // The core file is treated as an immutable snapshot.
        let mmap = unsafe { Mmap::map(&file) }?;
        Ok(Self {
            mmap: Arc::new(mmap),
        })
    }

    pub fn size(&self) -> usize {
        self.mmap.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.mmap.as_ref()
    }
}

impl DataSource for MmapSource {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        slice_at(&self.mmap, Address::zero(), addr, len).map(<[u8]>::to_vec)
    }
}
