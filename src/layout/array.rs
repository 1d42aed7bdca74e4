// Tue Jan 13 2026 - Alex

use crate::layout::{Layout, LayoutError, TypeKey, Value};
use crate::memory::{Address, DataSource};
use std::sync::Arc;

/// `count` consecutive elements, index 0 at the lowest address.
#[derive(Debug)]
pub struct ArrayLayout {
    key: TypeKey,
    element: Arc<dyn Layout>,
    count: usize,
    size: usize,
}

impl ArrayLayout {
    pub fn new(element: Arc<dyn Layout>, count: usize) -> Result<Self, LayoutError> {
        if count == 0 {
            return Err(LayoutError::InvalidArgument(format!(
                "zero-length array of {}",
                element.type_key()
            )));
        }
        let size = element.size().checked_mul(count).ok_or_else(|| {
            LayoutError::InvalidArgument(format!(
                "array of {} x {} overflows",
                count,
                element.type_key()
            ))
        })?;
        Ok(Self {
            key: TypeKey::array(element.type_key().clone(), count),
            element,
            count,
            size,
        })
    }

    pub fn element(&self) -> &Arc<dyn Layout> {
        &self.element
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Layout for ArrayLayout {
    fn type_key(&self) -> &TypeKey {
        &self.key
    }

    fn size(&self) -> usize {
        self.size
    }

    fn alignment(&self) -> usize {
        self.element.alignment()
    }

    fn read(&self, source: &dyn DataSource, addr: Address) -> Result<Value, LayoutError> {
        let stride = self.element.size() as u64;
        let items = (0..self.count as u64)
            .map(|i| self.element.read(source, addr + i * stride))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ByteOrder, PrimitiveLayout, PrimitiveType};
    use crate::memory::BufferSource;

    fn u16_layout() -> Arc<dyn Layout> {
        Arc::new(PrimitiveLayout::new(PrimitiveType::U16, ByteOrder::Little))
    }

    #[test]
    fn test_reads_in_ascending_order() {
        let source = BufferSource::new(vec![0xff, 1, 0, 2, 0, 3, 0]);
        let layout = ArrayLayout::new(u16_layout(), 3).unwrap();
        assert_eq!(layout.size(), 6);
        assert_eq!(
            layout.read(&source, Address::new(1)).unwrap(),
            Value::Array(vec![Value::U16(1), Value::U16(2), Value::U16(3)])
        );
    }

    #[test]
    fn test_partial_read_fails_whole_array() {
        let source = BufferSource::new(vec![1, 0, 2, 0, 3]);
        let layout = ArrayLayout::new(u16_layout(), 3).unwrap();
        assert!(layout.read(&source, Address::zero()).is_err());
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(
            ArrayLayout::new(u16_layout(), 0),
            Err(LayoutError::InvalidArgument(_))
        ));
    }
}
