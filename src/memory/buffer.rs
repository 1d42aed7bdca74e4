// Wed Jan 15 2026 - Alex

use crate::memory::{Address, DataSource, MemoryError};
use std::sync::Arc;

/// In-memory store; address `base` maps to `data[0]`.
#[derive(Clone)]
pub struct BufferSource {
    data: Arc<[u8]>,
    base_address: Address,
}

impl BufferSource {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        Self::with_base(data, Address::zero())
    }

    pub fn with_base(data: impl Into<Arc<[u8]>>, base_address: Address) -> Self {
        Self {
            data: data.into(),
            base_address,
        }
    }

    pub fn base_address(&self) -> Address {
        self.base_address
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

pub(crate) fn slice_at<'a>(
    data: &'a [u8],
    base: Address,
    addr: Address,
    len: usize,
) -> Result<&'a [u8], MemoryError> {
    let out_of_bounds = || MemoryError::OutOfBounds {
        addr: addr.as_u64(),
        len,
    };
    let offset = addr
        .as_u64()
        .checked_sub(base.as_u64())
        .ok_or_else(out_of_bounds)?;
    let start = usize::try_from(offset).map_err(|_| out_of_bounds())?;
    let end = start.checked_add(len).ok_or_else(out_of_bounds)?;
    data.get(start..end).ok_or_else(out_of_bounds)
}

impl DataSource for BufferSource {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        slice_at(&self.data, self.base_address, addr, len).map(<[u8]>::to_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_with_base() {
        let source = BufferSource::with_base(vec![1u8, 2, 3, 4], Address::new(0x1000));
        assert_eq!(source.read_bytes(Address::new(0x1001), 2).unwrap(), vec![2, 3]);
        assert!(source.read_bytes(Address::new(0xfff), 1).is_err());
    }

    #[test]
    fn test_short_read_fails() {
        let source = BufferSource::new(vec![0u8; 4]);
        assert!(matches!(
            source.read_bytes(Address::new(2), 4),
            Err(MemoryError::OutOfBounds { addr: 2, len: 4 })
        ));
    }

    #[test]
    fn test_read_c_string() {
        let source = BufferSource::new(b"abc\0def".to_vec());
        assert_eq!(source.read_c_string(Address::zero(), 16).unwrap(), "abc");
        assert!(matches!(
            source.read_c_string(Address::new(4), 16),
            Err(MemoryError::OutOfBounds { .. })
        ));
        assert!(matches!(
            source.read_c_string(Address::zero(), 2),
            Err(MemoryError::UnterminatedString { limit: 2, .. })
        ));
    }
}
