// Wed Jan 15 2026 - Alex

use crate::layout::{LayoutError, LayoutRegistry, PrimitiveType, TypeKey, Value};
use crate::memory::{Address, DataSource};
use std::sync::Arc;

pub const DEFAULT_MAX_STRING_LENGTH: usize = 4096;

/// A store paired with the registry describing its target.
#[derive(Clone)]
pub struct DataReader {
    source: Arc<dyn DataSource>,
    registry: Arc<LayoutRegistry>,
    max_string_length: usize,
}

impl DataReader {
    pub fn new(source: Arc<dyn DataSource>, registry: Arc<LayoutRegistry>) -> Self {
        Self {
            source,
            registry,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
        }
    }

    pub fn with_max_string_length(mut self, max_string_length: usize) -> Self {
        self.max_string_length = max_string_length;
        self
    }

    /// Same registry and limits, different store.
    pub fn with_source(&self, source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            registry: Arc::clone(&self.registry),
            max_string_length: self.max_string_length,
        }
    }

    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    pub fn registry(&self) -> &Arc<LayoutRegistry> {
        &self.registry
    }

    pub fn read(&self, key: &TypeKey, addr: Address) -> Result<Value, LayoutError> {
        let layout = self.registry.resolve(key)?;
        layout.read(self.source.as_ref(), addr)
    }

    pub fn read_array(&self, element: &TypeKey, count: usize, addr: Address) -> Result<Vec<Value>, LayoutError> {
        let layout = self.registry.resolve_array(element, count)?;
        layout.read(self.source.as_ref(), addr)?.into_array()
    }

    pub fn read_u32(&self, addr: Address) -> Result<u32, LayoutError> {
        Ok(self.read(&PrimitiveType::U32.into(), addr)?.as_u64()? as u32)
    }

    pub fn read_c_string(&self, addr: Address) -> Result<String, LayoutError> {
        Ok(self.source.read_c_string(addr, self.max_string_length)?)
    }
}
