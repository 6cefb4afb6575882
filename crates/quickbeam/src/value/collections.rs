//! Shared, interior-mutable storage behind objects and arrays

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::Value;

/// Handle to an object's property map.
///
/// Uses IndexMap so that iteration follows insertion order. Cloning the
/// handle aliases the same storage.
#[derive(Clone, Default)]
pub struct ObjectRef(Arc<RwLock<IndexMap<String, Value>>>);

impl ObjectRef {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing map.
    pub fn from_map(map: IndexMap<String, Value>) -> Self {
        Self(Arc::new(RwLock::new(map)))
    }

    /// Get a property by key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.read().get(key).cloned()
    }

    /// Set a property, returning the previous value.
    ///
    /// Overwriting keeps the key's original position.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.write().insert(key.into(), value)
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.read().contains_key(key)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Check if the object has no properties.
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Snapshot of the keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.0.read().keys().cloned().collect()
    }

    /// Snapshot of the entries in insertion order.
    ///
    /// Callers iterate the snapshot, so the object may be mutated while
    /// they do.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Whether two handles point at the same storage.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared storage, for cycle detection.
    pub(crate) fn as_ptr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast()
    }
}

impl From<IndexMap<String, Value>> for ObjectRef {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self::from_map(map)
    }
}

/// Handle to an array's elements.
#[derive(Clone, Default)]
pub struct ArrayRef(Arc<RwLock<Vec<Value>>>);

impl ArrayRef {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing vector.
    pub fn from_vec(items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    /// Get the element at `index`.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Replace the element at `index`.
    ///
    /// Returns `false` without changing anything if `index` is out of range.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.0.write().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Append an element.
    pub fn push(&self, value: Value) {
        self.0.write().push(value);
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Check if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Snapshot of the elements.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    /// Whether two handles point at the same storage.
    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn as_ptr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast()
    }
}

impl From<Vec<Value>> for ArrayRef {
    fn from(items: Vec<Value>) -> Self {
        Self::from_vec(items)
    }
}
