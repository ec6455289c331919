use crate::error::StoreError;

/// Synchronous string key-value store
///
/// This is the only persistence seam of the engine. Backends store opaque
/// text; typing and (de)serialization live in
/// [`PersistentStore`](super::PersistentStore).
pub trait KeyValueStore {
    /// Raw value under `key`, or `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under `key`
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    /// Delete `key`; removing an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
