// Tue Jan 13 2026 - Alex

use crate::layout::{ByteOrder, Layout, LayoutError, LayoutRegistry, PrimitiveType, TypeKey, Value};
use crate::memory::{Address, DataSource, MemoryError};
use std::sync::Arc;

/// Fixed-width scalar decoder with a byte order chosen at construction.
#[derive(Debug, Clone)]
pub struct PrimitiveLayout {
    key: TypeKey,
    kind: PrimitiveType,
    byte_order: ByteOrder,
}

fn fixed<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

impl PrimitiveLayout {
    pub fn new(kind: PrimitiveType, byte_order: ByteOrder) -> Self {
        Self {
            key: TypeKey::Primitive(kind),
            kind,
            byte_order,
        }
    }

    pub fn kind(&self) -> PrimitiveType {
        self.kind
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    fn u16(&self, bytes: &[u8]) -> u16 {
        match self.byte_order {
            ByteOrder::Big => u16::from_be_bytes(fixed(bytes)),
            ByteOrder::Little => u16::from_le_bytes(fixed(bytes)),
        }
    }

    fn u32(&self, bytes: &[u8]) -> u32 {
        match self.byte_order {
            ByteOrder::Big => u32::from_be_bytes(fixed(bytes)),
            ByteOrder::Little => u32::from_le_bytes(fixed(bytes)),
        }
    }

    fn u64(&self, bytes: &[u8]) -> u64 {
        match self.byte_order {
            ByteOrder::Big => u64::from_be_bytes(fixed(bytes)),
            ByteOrder::Little => u64::from_le_bytes(fixed(bytes)),
        }
    }

    /// Swap into native order, then reinterpret the bits.
    fn native<const N: usize>(&self, bytes: &[u8]) -> [u8; N] {
        let mut raw: [u8; N] = fixed(bytes);
        if !self.byte_order.is_native() {
            raw.reverse();
        }
        raw
    }

    pub fn decode(&self, bytes: &[u8]) -> Value {
        match self.kind {
            PrimitiveType::Bool => Value::Bool(bytes[0] != 0),
            PrimitiveType::I8 => Value::I8(bytes[0] as i8),
            PrimitiveType::U8 => Value::U8(bytes[0]),
            PrimitiveType::Char16 => Value::Char16(self.u16(bytes)),
            PrimitiveType::I16 => Value::I16(self.u16(bytes) as i16),
            PrimitiveType::U16 => Value::U16(self.u16(bytes)),
            PrimitiveType::I32 => Value::I32(self.u32(bytes) as i32),
            PrimitiveType::U32 => Value::U32(self.u32(bytes)),
            PrimitiveType::I64 => Value::I64(self.u64(bytes) as i64),
            PrimitiveType::U64 => Value::U64(self.u64(bytes)),
            PrimitiveType::F32 => Value::F32(f32::from_ne_bytes(self.native(bytes))),
            PrimitiveType::F64 => Value::F64(f64::from_ne_bytes(self.native(bytes))),
        }
    }
}

impl Layout for PrimitiveLayout {
    fn type_key(&self) -> &TypeKey {
        &self.key
    }

    fn size(&self) -> usize {
        self.kind.size()
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
        Ok(self.decode(&bytes))
    }
}

/// Installs all twelve primitive kinds under one byte order.
pub fn register_primitives(registry: &LayoutRegistry, byte_order: ByteOrder) -> Result<(), LayoutError> {
    for kind in PrimitiveType::ALL {
        registry.register(Arc::new(PrimitiveLayout::new(kind, byte_order)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::BufferSource;

    fn decode(kind: PrimitiveType, order: ByteOrder, bytes: Vec<u8>) -> Value {
        let source = BufferSource::new(bytes);
        PrimitiveLayout::new(kind, order)
            .read(&source, Address::zero())
            .unwrap()
    }

    #[test]
    fn test_sizes() {
        let sizes: Vec<usize> = PrimitiveType::ALL.iter().map(|k| k.size()).collect();
        assert_eq!(sizes, vec![1, 1, 1, 2, 2, 2, 4, 4, 8, 8, 4, 8]);
    }

    #[test]
    fn test_bool_truth_table() {
        assert_eq!(decode(PrimitiveType::Bool, ByteOrder::Little, vec![0x00]), Value::Bool(false));
        for byte in 0x01..=0xffu8 {
            assert_eq!(decode(PrimitiveType::Bool, ByteOrder::Big, vec![byte]), Value::Bool(true));
        }
    }

    #[test]
    fn test_byte_sign_extension() {
        assert_eq!(decode(PrimitiveType::I8, ByteOrder::Little, vec![0xfe]), Value::I8(-2));
        assert_eq!(decode(PrimitiveType::U8, ByteOrder::Little, vec![0xfe]), Value::U8(0xfe));
    }

    #[test]
    fn test_integers_round_trip_both_orders() {
        let cases: Vec<(PrimitiveType, Value, Vec<u8>, Vec<u8>)> = vec![
            (PrimitiveType::Char16, Value::Char16(0x263a), 0x263au16.to_le_bytes().to_vec(), 0x263au16.to_be_bytes().to_vec()),
            (PrimitiveType::I16, Value::I16(-1234), (-1234i16).to_le_bytes().to_vec(), (-1234i16).to_be_bytes().to_vec()),
            (PrimitiveType::U16, Value::U16(0xbeef), 0xbeefu16.to_le_bytes().to_vec(), 0xbeefu16.to_be_bytes().to_vec()),
            (PrimitiveType::I32, Value::I32(-0x1234567), (-0x1234567i32).to_le_bytes().to_vec(), (-0x1234567i32).to_be_bytes().to_vec()),
            (PrimitiveType::U32, Value::U32(0xfeedfacf), 0xfeedfacfu32.to_le_bytes().to_vec(), 0xfeedfacfu32.to_be_bytes().to_vec()),
            (PrimitiveType::I64, Value::I64(-0x0102_0304_0506_0708), (-0x0102_0304_0506_0708i64).to_le_bytes().to_vec(), (-0x0102_0304_0506_0708i64).to_be_bytes().to_vec()),
            (PrimitiveType::U64, Value::U64(0x7fff_5fc0_0000), 0x7fff_5fc0_0000u64.to_le_bytes().to_vec(), 0x7fff_5fc0_0000u64.to_be_bytes().to_vec()),
        ];

        for (kind, expected, le, be) in cases {
            assert_eq!(decode(kind, ByteOrder::Little, le.clone()), expected, "{:?} le", kind);
            assert_eq!(decode(kind, ByteOrder::Big, be), expected, "{:?} be", kind);
            assert_ne!(decode(kind, ByteOrder::Big, le), expected, "{:?} swapped", kind);
        }
    }

    #[test]
    fn test_floats_round_trip_both_orders() {
        let value = 3.141_592_7f32;
        assert_eq!(decode(PrimitiveType::F32, ByteOrder::Little, value.to_le_bytes().to_vec()), Value::F32(value));
        assert_eq!(decode(PrimitiveType::F32, ByteOrder::Big, value.to_be_bytes().to_vec()), Value::F32(value));
        assert_ne!(decode(PrimitiveType::F32, ByteOrder::Big, value.to_le_bytes().to_vec()), Value::F32(value));

        let value = -2.718_281_828_459_045f64;
        assert_eq!(decode(PrimitiveType::F64, ByteOrder::Little, value.to_le_bytes().to_vec()), Value::F64(value));
        assert_eq!(decode(PrimitiveType::F64, ByteOrder::Big, value.to_be_bytes().to_vec()), Value::F64(value));
        assert_ne!(decode(PrimitiveType::F64, ByteOrder::Little, value.to_be_bytes().to_vec()), Value::F64(value));
    }

    #[test]
    fn test_double_reads_all_eight_bytes() {
        let source = BufferSource::new(1.0f64.to_le_bytes()[..4].to_vec());
        let layout = PrimitiveLayout::new(PrimitiveType::F64, ByteOrder::Little);
        assert!(matches!(
            layout.read(&source, Address::zero()),
            Err(LayoutError::Memory(MemoryError::OutOfBounds { len: 8, .. }))
        ));
    }

    #[test]
    fn test_read_at_offset() {
        let source = BufferSource::new(vec![0xaa, 0x01, 0x00, 0x00, 0x00]);
        let layout = PrimitiveLayout::new(PrimitiveType::U32, ByteOrder::Little);
        assert_eq!(layout.read(&source, Address::new(1)).unwrap(), Value::U32(1));
        assert!(layout.read(&source, Address::new(2)).is_err());
    }

    #[test]
    fn test_register_primitives() {
        let registry = LayoutRegistry::new();
        register_primitives(&registry, ByteOrder::Big).unwrap();
        for kind in PrimitiveType::ALL {
            let layout = registry.resolve(&TypeKey::Primitive(kind)).unwrap();
            assert_eq!(layout.size(), kind.size());
        }
        assert!(matches!(
            register_primitives(&registry, ByteOrder::Little),
            Err(LayoutError::DuplicateRegistration(_))
        ));
    }
}
