// Tue Jan 13 2026 - Alex

use crate::layout::{Layout, LayoutError, LayoutRegistry, TypeKey, Value};
use crate::memory::{Address, DataSource};
use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RecordField {
    name: &'static str,
    offset: usize,
    layout: Arc<dyn Layout>,
}

impl RecordField {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn layout(&self) -> &Arc<dyn Layout> {
        &self.layout
    }
}

/// Named fields at fixed offsets, each decoded by a registry layout.
#[derive(Debug)]
pub struct StructLayout {
    key: TypeKey,
    fields: Vec<RecordField>,
    size: usize,
    alignment: usize,
}

impl StructLayout {
    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&RecordField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl Layout for StructLayout {
    fn type_key(&self) -> &TypeKey {
        &self.key
    }

    fn size(&self) -> usize {
        self.size
    }

    fn alignment(&self) -> usize {
        self.alignment
    }

    fn read(&self, source: &dyn DataSource, addr: Address) -> Result<Value, LayoutError> {
        let mut values = IndexMap::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = field.layout.read(source, addr + field.offset as u64)?;
            values.insert(field.name, value);
        }
        Ok(Value::Struct(values))
    }
}

fn align_up(value: usize, alignment: usize) -> usize {
    if alignment <= 1 {
        return value;
    }
    (value + alignment - 1) & !(alignment - 1)
}

/// Lays out fields in declaration order with natural alignment, the way a C
/// compiler would for the target the registry describes.
pub struct StructBuilder<'a> {
    name: &'static str,
    registry: &'a LayoutRegistry,
    fields: Vec<RecordField>,
    end: usize,
    alignment: usize,
}

impl<'a> StructBuilder<'a> {
    pub fn new(name: &'static str, registry: &'a LayoutRegistry) -> Self {
        Self {
            name,
            registry,
            fields: Vec::new(),
            end: 0,
            alignment: 1,
        }
    }

    pub fn field(self, name: &'static str, key: impl Into<TypeKey>) -> Result<Self, LayoutError> {
        let layout = self.registry.resolve(&key.into())?;
        let offset = align_up(self.end, layout.alignment());
        self.push(name, offset, layout)
    }

    pub fn field_at(
        self,
        name: &'static str,
        offset: usize,
        key: impl Into<TypeKey>,
    ) -> Result<Self, LayoutError> {
        let layout = self.registry.resolve(&key.into())?;
        self.push(name, offset, layout)
    }

    fn push(mut self, name: &'static str, offset: usize, layout: Arc<dyn Layout>) -> Result<Self, LayoutError> {
        if self.fields.iter().any(|f| f.name == name) {
            return Err(LayoutError::InvalidArgument(format!(
                "duplicate field {} in {}",
                name, self.name
            )));
        }
        self.end = self.end.max(offset + layout.size());
        self.alignment = self.alignment.max(layout.alignment());
        self.fields.push(RecordField { name, offset, layout });
        Ok(self)
    }

    pub fn build(self) -> Result<StructLayout, LayoutError> {
        if self.fields.is_empty() {
            return Err(LayoutError::InvalidArgument(format!(
                "record {} has no fields",
                self.name
            )));
        }
        Ok(StructLayout {
            key: TypeKey::Named(self.name),
            size: align_up(self.end, self.alignment),
            alignment: self.alignment,
            fields: self.fields,
        })
    }
}
