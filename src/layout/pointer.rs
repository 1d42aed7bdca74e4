// Tue Jan 13 2026 - Alex

use crate::layout::{ByteOrder, Layout, LayoutError, TypeKey, Value};
use crate::memory::{Address, DataSource, MemoryError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerWidth {
    #[serde(rename = "32")]
    Bits32,
    #[serde(rename = "64")]
    Bits64,
}

impl PointerWidth {
    pub fn bytes(self) -> usize {
        match self {
            Self::Bits32 => 4,
            Self::Bits64 => 8,
        }
    }
}

/// Unsigned target-width address, zero-extended to 64 bits.
#[derive(Debug, Clone)]
pub struct PointerLayout {
    key: TypeKey,
    width: PointerWidth,
    byte_order: ByteOrder,
}

impl PointerLayout {
    pub fn new(width: PointerWidth, byte_order: ByteOrder) -> Self {
        Self {
            key: TypeKey::Pointer,
            width,
            byte_order,
        }
    }
}

impl Layout for PointerLayout {
    fn type_key(&self) -> &TypeKey {
        &self.key
    }

    fn size(&self) -> usize {
        self.width.bytes()
    }

    fn read(&self, source: &dyn DataSource, addr: Address) -> Result<Value, LayoutError> {
        let bytes = source.read_bytes(addr, self.size())?;
        if bytes.len() != self.size() {
            return Err(MemoryError::OutOfBounds {
                addr: addr.as_u64(),
                len: self.size(),
            }
            .into());
        }
        let value = match (self.width, self.byte_order) {
            (PointerWidth::Bits32, ByteOrder::Little) => {
                u64::from(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            (PointerWidth::Bits32, ByteOrder::Big) => {
                u64::from(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            (PointerWidth::Bits64, ByteOrder::Little) => u64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]),
            (PointerWidth::Bits64, ByteOrder::Big) => u64::from_be_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]),
        };
        Ok(Value::Pointer(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::BufferSource;

    #[test]
    fn test_pointer_widths() {
        let source = BufferSource::new(vec![0x00, 0x10, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]);
        let narrow = PointerLayout::new(PointerWidth::Bits32, ByteOrder::Little);
        let wide = PointerLayout::new(PointerWidth::Bits64, ByteOrder::Little);
        assert_eq!(narrow.size(), 4);
        assert_eq!(narrow.read(&source, Address::zero()).unwrap(), Value::Pointer(0x1000));
        assert_eq!(wide.read(&source, Address::zero()).unwrap(), Value::Pointer(0x1_0000_1000));
    }

    #[test]
    fn test_big_endian_pointer() {
        let source = BufferSource::new(vec![0x00, 0x00, 0x40, 0x00]);
        let layout = PointerLayout::new(PointerWidth::Bits32, ByteOrder::Big);
        assert_eq!(layout.read(&source, Address::zero()).unwrap(), Value::Pointer(0x4000));
    }

    /// Hands back fewer bytes than asked for.
    struct ShortSource;

    impl DataSource for ShortSource {
        fn read_bytes(&self, _addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
            Ok(vec![0xff; len / 2])
        }
    }

    #[test]
    fn test_short_read_is_out_of_bounds() {
        for width in [PointerWidth::Bits32, PointerWidth::Bits64] {
            let layout = PointerLayout::new(width, ByteOrder::Little);
            assert!(matches!(
                layout.read(&ShortSource, Address::new(0x10)),
                Err(LayoutError::Memory(MemoryError::OutOfBounds { addr: 0x10, .. }))
            ));
        }
    }
}
