// Tue Jan 13 2026 - Alex

use crate::layout::primitive::register_primitives;
use crate::layout::{ArrayLayout, ByteOrder, Layout, LayoutError, PointerLayout, PointerWidth, TypeKey};
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

type Provider = Arc<dyn Fn(&TypeKey, &LayoutRegistry) -> Option<Arc<dyn Layout>> + Send + Sync>;

/// Maps type identities to layouts.
///
/// Explicit registrations and provider results share one map; derived array
/// layouts are cached separately by `(element, count)`. Nothing is evicted.
/// Once a key is cached every lookup returns the same `Arc`.
pub struct LayoutRegistry {
    layouts: RwLock<AHashMap<TypeKey, Arc<dyn Layout>>>,
    providers: RwLock<Vec<Provider>>,
    arrays: RwLock<AHashMap<(TypeKey, usize), Arc<dyn Layout>>>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self {
            layouts: RwLock::new(AHashMap::new()),
            providers: RwLock::new(Vec::new()),
            arrays: RwLock::new(AHashMap::new()),
        }
    }

    /// Primitive family plus a pointer layout for one target.
    pub fn for_target(byte_order: ByteOrder, pointer_width: PointerWidth) -> Result<Self, LayoutError> {
        let registry = Self::new();
        register_primitives(&registry, byte_order)?;
        registry.register(Arc::new(PointerLayout::new(pointer_width, byte_order)))?;
        Ok(registry)
    }

    pub fn register(&self, layout: Arc<dyn Layout>) -> Result<(), LayoutError> {
        let key = layout.type_key().clone();
        if key.is_array() {
            return Err(LayoutError::InvalidArgument(format!(
                "{} is derived and cannot be registered",
                key
            )));
        }
        if layout.size() == 0 {
            return Err(LayoutError::InvalidArgument(format!("{} has zero size", key)));
        }
        let mut layouts = self.layouts.write();
        if layouts.contains_key(&key) {
            return Err(LayoutError::DuplicateRegistration(key));
        }
        layouts.insert(key, layout);
        Ok(())
    }

    /// Appends a fallback consulted, in registration order, for unknown keys.
    pub fn register_provider<F>(&self, provider: F)
    where
        F: Fn(&TypeKey, &LayoutRegistry) -> Option<Arc<dyn Layout>> + Send + Sync + 'static,
    {
        self.providers.write().push(Arc::new(provider));
    }

    pub fn resolve(&self, key: &TypeKey) -> Result<Arc<dyn Layout>, LayoutError> {
        if let TypeKey::Array(element, count) = key {
            return self.resolve_array(element, *count);
        }
        if let Some(layout) = self.layouts.read().get(key) {
            return Ok(Arc::clone(layout));
        }

        // Providers may resolve other keys, so no lock is held while they run.
        let providers: Vec<Provider> = self.providers.read().clone();
        for provider in &providers {
            if let Some(layout) = provider(key, self) {
                if layout.size() == 0 {
                    return Err(LayoutError::InvalidArgument(format!(
                        "provider returned zero-size layout for {}",
                        key
                    )));
                }
                log::trace!("Provider resolved layout for {}", key);
                let mut layouts = self.layouts.write();
                let cached = layouts.entry(key.clone()).or_insert(layout);
                return Ok(Arc::clone(cached));
            }
        }

        Err(LayoutError::Unresolved(key.clone()))
    }

    /// One-dimensional, fixed-length sequence of `element`.
    pub fn resolve_array(&self, element: &TypeKey, count: usize) -> Result<Arc<dyn Layout>, LayoutError> {
        if element.is_array() {
            return Err(LayoutError::InvalidArgument(format!(
                "multi-dimensional array [{}; {}]",
                element, count
            )));
        }
        if count == 0 {
            return Err(LayoutError::InvalidArgument(format!(
                "zero-length array of {}",
                element
            )));
        }

        let cache_key = (element.clone(), count);
        if let Some(layout) = self.arrays.read().get(&cache_key) {
            return Ok(Arc::clone(layout));
        }

        let element_layout = self.resolve(element)?;
        let layout: Arc<dyn Layout> = Arc::new(ArrayLayout::new(element_layout, count)?);
        let mut arrays = self.arrays.write();
        let cached = arrays.entry(cache_key).or_insert(layout);
        Ok(Arc::clone(cached))
    }

    /// Like [`resolve_array`](Self::resolve_array) but takes the composite key.
    pub fn resolve_sequence(&self, key: &TypeKey) -> Result<Arc<dyn Layout>, LayoutError> {
        match key {
            TypeKey::Array(element, count) => self.resolve_array(element, *count),
            other => Err(LayoutError::InvalidArgument(format!(
                "{} is not a sequence type",
                other
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.layouts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.read().is_empty()
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::new()
    }
}
