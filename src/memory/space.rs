// Wed Jan 15 2026 - Alex

use crate::memory::{Address, DataSource, MemoryError, MemoryRange};
use std::sync::Arc;

/// One virtual range backed by bytes of the underlying store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentMapping {
    pub range: MemoryRange,
    pub file_offset: u64,
}

/// Virtual address space assembled from segment mappings over a store.
///
/// Reads that straddle adjacent mappings are stitched together; any byte
/// outside every mapping fails the whole read.
pub struct SegmentAddressSpace {
    source: Arc<dyn DataSource>,
    mappings: Vec<SegmentMapping>,
}

impl SegmentAddressSpace {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            mappings: Vec::new(),
        }
    }

    pub fn add_mapping(&mut self, vm_start: Address, size: u64, file_offset: u64) {
        let range = MemoryRange::from_start_size(vm_start, size);
        if range.is_empty() {
            return;
        }
        let index = self
            .mappings
            .partition_point(|m| m.range.start() <= range.start());
        self.mappings.insert(index, SegmentMapping { range, file_offset });
    }

    pub fn mappings(&self) -> &[SegmentMapping] {
        &self.mappings
    }

    fn find(&self, addr: Address) -> Option<&SegmentMapping> {
        let index = self.mappings.partition_point(|m| m.range.start() <= addr);
        let candidate = self.mappings.get(index.checked_sub(1)?)?;
        candidate.range.contains(addr).then_some(candidate)
    }
}

impl DataSource for SegmentAddressSpace {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let mut result = Vec::with_capacity(len);
        let mut current = addr;
        while result.len() < len {
            let mapping = self
                .find(current)
                .ok_or(MemoryError::Unmapped(current.as_u64()))?;
            let delta = current.as_u64() - mapping.range.start().as_u64();
            let available = mapping.range.size() - delta;
            let wanted = ((len - result.len()) as u64).min(available) as usize;
            let file_offset = mapping
                .file_offset
                .checked_add(delta)
                .ok_or(MemoryError::OutOfBounds {
                    addr: current.as_u64(),
                    len: wanted,
                })?;
            let chunk = self.source.read_bytes(Address::new(file_offset), wanted)?;
            result.extend_from_slice(&chunk);
            current = current + wanted as u64;
        }
        Ok(result)
    }
}
