// Wed Jan 15 2026 - Alex

use crate::memory::{Address, MemoryError};

/// A byte-addressable store: a file, a core dump, a live process.
pub trait DataSource: Send + Sync {
    /// Reads exactly `len` bytes at `addr`; short reads are errors.
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError>;

    fn read_u8(&self, addr: Address) -> Result<u8, MemoryError> {
        let bytes = self.read_bytes(addr, 1)?;
        bytes.first().copied().ok_or(MemoryError::OutOfBounds {
            addr: addr.as_u64(),
            len: 1,
        })
    }

    fn read_c_string(&self, addr: Address, limit: usize) -> Result<String, MemoryError> {
        let mut bytes = Vec::new();
        let mut current = addr;
        loop {
            let byte = self.read_u8(current)?;
            if byte == 0 {
                break;
            }
            bytes.push(byte);
            if bytes.len() >= limit {
                return Err(MemoryError::UnterminatedString {
                    addr: addr.as_u64(),
                    limit,
                });
            }
            current = current + 1;
        }
        String::from_utf8(bytes).map_err(|_| MemoryError::InvalidString(addr.as_u64()))
    }
}
