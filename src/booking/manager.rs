use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::calculator::compute_booking;
use super::clock::{Clock, SystemClock};
use crate::catalog::Catalog;
use crate::error::BookingError;
use crate::models::{Booking, BookingId, BookingRequest, BookingStatus, Listing, ListingId};
use crate::store::{KeyValueStore, PersistentStore};

/// Outcome of [`BookingManager::toggle_favorite`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteToggle {
    /// `true` if the listing is now a favorite
    pub added: bool,
}

/// Owns the mutation path for bookings and favorites
///
/// Every mutating call is one load-modify-save cycle against the store and
/// takes `&mut self`, so cycles cannot interleave. A failed call writes
/// nothing.
#[derive(Debug)]
pub struct BookingManager<S, C = SystemClock> {
    store: PersistentStore<S>,
    clock: C,
}

impl<S: KeyValueStore> BookingManager<S, SystemClock> {
    pub fn new(backend: S) -> Self {
        Self::with_clock(backend, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> BookingManager<S, C> {
    pub fn with_clock(backend: S, clock: C) -> Self {
        Self {
            store: PersistentStore::new(backend),
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &PersistentStore<S> {
        &self.store
    }

    pub fn into_store(self) -> PersistentStore<S> {
        self.store
    }

    /// Price and record a new pending booking
    pub fn create_booking(
        &mut self,
        listing: &Listing,
        request: BookingRequest,
    ) -> Result<Booking, BookingError> {
        let quote = compute_booking(request.check_in, request.check_out, listing.monthly_price)?;

        let mut bookings = self.store.load_bookings()?;
        let created_at = self.clock.now();
        let id = next_id(&bookings, created_at.timestamp_millis());

        let booking = Booking {
            id,
            listing_id: listing.id,
            listing_name: listing.name.clone(),
            check_in: request.check_in,
            check_out: request.check_out,
            room_type: request.room_type,
            special_requests: request.special_requests,
            total_amount: quote.total_amount,
            status: BookingStatus::Pending,
            created_at,
        };

        bookings.push(booking.clone());
        self.store.save_bookings(&bookings)?;

        info!(
            "Booking #{} created for {} ({} days, total {})",
            booking.id, booking.listing_name, quote.duration_days, booking.total_amount
        );
        Ok(booking)
    }

    /// Move a pending booking to cancelled, keeping its position and fields
    pub fn cancel_booking(&mut self, id: BookingId) -> Result<(), BookingError> {
        let mut bookings = self.store.load_bookings()?;
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(BookingError::NotFound(id))?;

        booking.cancel()?;
        self.store.save_bookings(&bookings)?;

        info!("Booking #{} cancelled", id);
        Ok(())
    }

    pub fn get_booking(&self, id: BookingId) -> Result<Option<Booking>, BookingError> {
        let bookings = self.store.load_bookings()?;
        Ok(bookings.into_iter().find(|b| b.id == id))
    }

    /// All bookings, newest first; equal timestamps keep insertion order
    pub fn list_bookings(&self) -> Result<Vec<Booking>, BookingError> {
        let mut bookings = self.store.load_bookings()?;
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    /// Flip favorite membership of a listing
    pub fn toggle_favorite(&mut self, listing_id: ListingId) -> Result<FavoriteToggle, BookingError> {
        let mut favorites = self.store.load_favorites()?;

        let added = match favorites.iter().position(|id| *id == listing_id) {
            Some(pos) => {
                favorites.remove(pos);
                false
            }
            None => {
                favorites.push(listing_id);
                true
            }
        };

        self.store.save_favorites(&favorites)?;
        debug!("Listing {} favorite={}", listing_id, added);
        Ok(FavoriteToggle { added })
    }

    /// Remove a favorite; returns whether it was present
    pub fn remove_favorite(&mut self, listing_id: ListingId) -> Result<bool, BookingError> {
        let mut favorites = self.store.load_favorites()?;
        let before = favorites.len();
        favorites.retain(|id| *id != listing_id);
        if favorites.len() == before {
            return Ok(false);
        }

        self.store.save_favorites(&favorites)?;
        Ok(true)
    }

    pub fn is_favorite(&self, listing_id: ListingId) -> Result<bool, BookingError> {
        Ok(self.store.load_favorites()?.contains(&listing_id))
    }

    /// Favorite listings in catalog order; ids missing from the catalog are skipped
    pub fn list_favorite_listings<'c>(
        &self,
        catalog: &'c Catalog,
    ) -> Result<Vec<&'c Listing>, BookingError> {
        let favorites = self.store.load_favorites()?;

        for id in favorites.iter().filter(|id| catalog.get(**id).is_none()) {
            debug!("Skipping favorite {} not present in catalog", id);
        }

        Ok(catalog
            .iter()
            .filter(|listing| favorites.contains(&listing.id))
            .collect())
    }
}

/// Millisecond timestamp, bumped past every stored id so ids stay strictly increasing
///
/// A stored id of `BookingId::MAX` leaves nothing above it; the first free id
/// at or after the timestamp is used instead.
fn next_id(existing: &[Booking], candidate: BookingId) -> BookingId {
    let Some(max) = existing.iter().map(|b| b.id).max() else {
        return candidate;
    };
    match max.checked_add(1) {
        Some(next) => candidate.max(next),
        None => (candidate..=BookingId::MAX)
            .find(|id| existing.iter().all(|b| b.id != *id))
            .unwrap_or(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::ManualClock;
    use crate::error::StoreError;
    use crate::models::RoomType;
    use crate::store::{MemoryStore, BOOKINGS_KEY, FAVORITES_KEY};
    use chrono::{NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::io;
    use std::rc::Rc;

    /// Memory store whose writes can be switched off to simulate a full disk
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: Rc<Cell<bool>>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
            if self.fail_writes.get() {
                return Err(StoreError::Io {
                    key: key.to_string(),
                    source: io::Error::new(io::ErrorKind::Other, "disk full"),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    fn manager() -> BookingManager<MemoryStore, ManualClock> {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        BookingManager::with_clock(MemoryStore::new(), ManualClock::new(start))
    }

    fn request(check_in: &str, check_out: &str) -> BookingRequest {
        BookingRequest::new(
            check_in.parse::<NaiveDate>().unwrap(),
            check_out.parse::<NaiveDate>().unwrap(),
            RoomType::Double,
        )
    }

    #[test]
    fn create_booking_records_pending_snapshot() {
        let catalog = Catalog::builtin();
        let listing = catalog.get(3).unwrap();
        let mut manager = manager();

        let booking = manager
            .create_booking(
                listing,
                request("2025-01-01", "2025-01-31").with_special_requests("quiet room"),
            )
            .unwrap();

        assert_eq!(booking.listing_id, 3);
        assert_eq!(booking.listing_name, "Elite Student Housing");
        assert_eq!(booking.total_amount, 10_000);
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.special_requests.as_deref(), Some("quiet room"));
        assert_eq!(booking.id, manager.clock().now().timestamp_millis());
        assert_eq!(manager.list_bookings().unwrap(), vec![booking]);
    }

    #[test]
    fn invalid_range_writes_nothing() {
        let catalog = Catalog::builtin();
        let mut manager = manager();

        let err = manager
            .create_booking(catalog.get(1).unwrap(), request("2025-02-01", "2025-02-01"))
            .unwrap_err();

        assert!(matches!(err, BookingError::InvalidDateRange { .. }));
        assert_eq!(manager.store().backend().get(BOOKINGS_KEY).unwrap(), None);
    }

    #[test]
    fn ids_stay_unique_when_clock_stalls() {
        let catalog = Catalog::builtin();
        let listing = catalog.get(1).unwrap();
        let mut manager = manager();

        let a = manager.create_booking(listing, request("2025-01-01", "2025-01-02")).unwrap();
        let b = manager.create_booking(listing, request("2025-01-01", "2025-01-02")).unwrap();
        let c = manager.create_booking(listing, request("2025-01-01", "2025-01-02")).unwrap();

        assert!(a.id < b.id && b.id < c.id);
        // same timestamp: insertion order
        let listed: Vec<_> = manager.list_bookings().unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(listed, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn cancel_keeps_position_and_fields() {
        let catalog = Catalog::builtin();
        let listing = catalog.get(2).unwrap();
        let mut manager = manager();

        let first = manager.create_booking(listing, request("2025-01-01", "2025-01-11")).unwrap();
        manager.clock().advance(chrono::Duration::minutes(1));
        let second = manager.create_booking(listing, request("2025-03-01", "2025-04-01")).unwrap();

        manager.cancel_booking(first.id).unwrap();

        let stored = manager.store().load_bookings().unwrap();
        assert_eq!(stored[0].id, first.id);
        assert_eq!(stored[0].status, BookingStatus::Cancelled);
        assert_eq!(stored[0].total_amount, first.total_amount);
        assert_eq!(stored[1], second);
    }

    #[test]
    fn cancel_errors() {
        let catalog = Catalog::builtin();
        let mut manager = manager();
        let booking = manager
            .create_booking(catalog.get(4).unwrap(), request("2025-05-01", "2025-06-01"))
            .unwrap();

        assert!(matches!(manager.cancel_booking(7), Err(BookingError::NotFound(7))));

        manager.cancel_booking(booking.id).unwrap();
        let err = manager.cancel_booking(booking.id).unwrap_err();
        assert!(matches!(err, BookingError::AlreadyTerminal(id) if id == booking.id));

        let status = manager.get_booking(booking.id).unwrap().unwrap().status;
        assert_eq!(status, BookingStatus::Cancelled);
    }

    #[test]
    fn toggle_and_remove_favorites() {
        let mut manager = manager();

        assert_eq!(manager.toggle_favorite(5).unwrap(), FavoriteToggle { added: true });
        assert!(manager.is_favorite(5).unwrap());
        assert_eq!(manager.toggle_favorite(5).unwrap(), FavoriteToggle { added: false });
        assert!(!manager.is_favorite(5).unwrap());

        manager.toggle_favorite(2).unwrap();
        assert!(manager.remove_favorite(2).unwrap());
        assert!(!manager.remove_favorite(2).unwrap());
    }

    #[test]
    fn favorite_listings_follow_catalog_and_skip_unknown_ids() {
        let catalog = Catalog::builtin();
        let mut manager = manager();
        for id in [6, 99, 1] {
            manager.toggle_favorite(id).unwrap();
        }

        let names: Vec<_> = manager
            .list_favorite_listings(&catalog)
            .unwrap()
            .into_iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names, vec!["Campus View Hostel", "Comfort Inn Lodge"]);
    }

    #[test]
    fn next_id_bumps_past_existing() {
        assert_eq!(next_id(&[], 100), 100);

        let catalog = Catalog::builtin();
        let mut manager = manager();
        let booking = manager
            .create_booking(catalog.get(1).unwrap(), request("2025-01-01", "2025-01-05"))
            .unwrap();
        let stored = manager.store().load_bookings().unwrap();
        assert_eq!(next_id(&stored, booking.id - 5_000), booking.id + 1);
        assert_eq!(next_id(&stored, booking.id + 5_000), booking.id + 5_000);
    }

    #[test]
    fn max_stored_id_does_not_overflow() {
        let catalog = Catalog::builtin();
        let mut manager = manager();
        let mut seeded = manager
            .create_booking(catalog.get(1).unwrap(), request("2025-01-01", "2025-01-05"))
            .unwrap();
        seeded.id = BookingId::MAX;
        manager.store.save_bookings(&[seeded]).unwrap();

        let booking = manager
            .create_booking(catalog.get(2).unwrap(), request("2025-02-01", "2025-02-05"))
            .unwrap();
        assert_eq!(booking.id, manager.clock().now().timestamp_millis());
        assert_eq!(manager.list_bookings().unwrap().len(), 2);

        let taken = manager.store().load_bookings().unwrap();
        assert_eq!(next_id(&taken, booking.id), booking.id + 1);
    }

    #[test]
    fn failed_writes_leave_state_untouched() {
        let catalog = Catalog::builtin();
        let fail_writes = Rc::new(Cell::new(false));
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let backend = FlakyStore {
            inner: MemoryStore::new(),
            fail_writes: Rc::clone(&fail_writes),
        };
        let mut manager = BookingManager::with_clock(backend, ManualClock::new(start));

        let booking = manager
            .create_booking(catalog.get(1).unwrap(), request("2025-01-01", "2025-01-31"))
            .unwrap();
        manager.toggle_favorite(3).unwrap();
        let raw = |m: &BookingManager<FlakyStore, ManualClock>, key: &str| {
            m.store().backend().get(key).unwrap()
        };
        let bookings_before = raw(&manager, BOOKINGS_KEY);
        let favorites_before = raw(&manager, FAVORITES_KEY);

        fail_writes.set(true);
        manager.clock().advance(chrono::Duration::minutes(1));

        let err = manager
            .create_booking(catalog.get(2).unwrap(), request("2025-03-01", "2025-04-01"))
            .unwrap_err();
        assert!(matches!(err, BookingError::Store(StoreError::Io { .. })));
        let err = manager.cancel_booking(booking.id).unwrap_err();
        assert!(matches!(err, BookingError::Store(_)));
        let err = manager.toggle_favorite(3).unwrap_err();
        assert!(matches!(err, BookingError::Store(_)));

        assert_eq!(raw(&manager, BOOKINGS_KEY), bookings_before);
        assert_eq!(raw(&manager, FAVORITES_KEY), favorites_before);
        assert_eq!(manager.list_bookings().unwrap(), vec![booking]);
        assert!(manager.is_favorite(3).unwrap());
    }
}
