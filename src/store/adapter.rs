use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::traits::KeyValueStore;
use crate::error::StoreError;
use crate::models::{Booking, ListingId};

/// Key holding the JSON array of bookings
pub const BOOKINGS_KEY: &str = "bookings";

/// Key holding the JSON array of favorite listing ids
pub const FAVORITES_KEY: &str = "favorites";

/// Typed view over a [`KeyValueStore`]
///
/// A missing or undecodable collection reads as empty. Corruption is logged
/// and then overwritten by the next save; backend failures still propagate.
#[derive(Debug, Clone, Default)]
pub struct PersistentStore<S> {
    backend: S,
}

impl<S: KeyValueStore> PersistentStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn into_inner(self) -> S {
        self.backend
    }

    /// Bookings in insertion order
    pub fn load_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        self.load_collection(BOOKINGS_KEY)
    }

    pub fn save_bookings(&mut self, bookings: &[Booking]) -> Result<(), StoreError> {
        self.save_collection(BOOKINGS_KEY, bookings)
    }

    /// Favorite ids in insertion order, duplicates dropped
    pub fn load_favorites(&self) -> Result<Vec<ListingId>, StoreError> {
        let mut ids: Vec<ListingId> = self.load_collection(FAVORITES_KEY)?;
        let mut seen = std::collections::HashSet::new();
        ids.retain(|id| seen.insert(*id));
        Ok(ids)
    }

    pub fn save_favorites(&mut self, ids: &[ListingId]) -> Result<(), StoreError> {
        self.save_collection(FAVORITES_KEY, ids)
    }

    /// Drop both collections
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.backend.remove(BOOKINGS_KEY)?;
        self.backend.remove(FAVORITES_KEY)
    }

    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        match decode(key, &raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!("Treating {} as empty: {}", key, err);
                Ok(Vec::new())
            }
        }
    }

    fn save_collection<T: Serialize>(&mut self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items)?;
        debug!("Writing {} items under {}", items.len(), key);
        self.backend.set(key, raw)
    }
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<Vec<T>, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::CorruptStoreData {
        key: key.to_string(),
        source,
    })
}
