use chrono::{Duration, NaiveDate, TimeZone, Utc};
use havenly::booking::ManualClock;
use havenly::store::{FileStore, KeyValueStore, MemoryStore, BOOKINGS_KEY, FAVORITES_KEY};
use havenly::{
    BookingError, BookingManager, BookingRequest, BookingStatus, Catalog, RoomType,
};
use pretty_assertions::assert_eq;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap())
}

#[test]
fn bookings_list_newest_first() {
    let catalog = Catalog::builtin();
    let mut manager = BookingManager::with_clock(MemoryStore::new(), clock());

    let mut ids = Vec::new();
    for listing_id in [1, 2, 3] {
        manager.clock().advance(Duration::seconds(1));
        let booking = manager
            .create_booking(
                catalog.get(listing_id).unwrap(),
                BookingRequest::new(date("2025-07-01"), date("2025-08-01"), RoomType::Single),
            )
            .unwrap();
        ids.push(booking.id);
    }

    let listed: Vec<_> = manager.list_bookings().unwrap().iter().map(|b| b.id).collect();
    assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);

    // storage keeps append order
    let stored: Vec<_> = manager
        .store()
        .load_bookings()
        .unwrap()
        .iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(stored, ids);
}

#[test]
fn cancelling_twice_reports_terminal_state() {
    let catalog = Catalog::builtin();
    let mut manager = BookingManager::with_clock(MemoryStore::new(), clock());
    let booking = manager
        .create_booking(
            catalog.get(6).unwrap(),
            BookingRequest::new(date("2025-07-01"), date("2025-07-16"), RoomType::Triple),
        )
        .unwrap();
    assert_eq!(booking.total_amount, 3750);

    manager.cancel_booking(booking.id).unwrap();
    let err = manager.cancel_booking(booking.id).unwrap_err();
    assert!(matches!(err, BookingError::AlreadyTerminal(_)));

    let stored = manager.get_booking(booking.id).unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Cancelled);
    assert_eq!(stored.total_amount, 3750);
}

#[test]
fn double_toggle_restores_favorites() {
    let mut manager = BookingManager::with_clock(MemoryStore::new(), clock());
    manager.toggle_favorite(1).unwrap();
    manager.toggle_favorite(4).unwrap();
    let before = manager.store().load_favorites().unwrap();

    for id in [4, 2] {
        let first = manager.toggle_favorite(id).unwrap();
        let second = manager.toggle_favorite(id).unwrap();
        assert_ne!(first.added, second.added);

        let after = manager.store().load_favorites().unwrap();
        assert_eq!(after.len(), before.len());
        assert_eq!(after.contains(&id), before.contains(&id));
    }
}

#[test]
fn file_store_persists_across_managers() {
    let tmp = tempfile::tempdir().unwrap();
    let catalog = Catalog::builtin();

    let booking = {
        let mut manager =
            BookingManager::with_clock(FileStore::open(tmp.path()).unwrap(), clock());
        manager.toggle_favorite(3).unwrap();
        manager
            .create_booking(
                catalog.get(3).unwrap(),
                BookingRequest::new(date("2025-09-01"), date("2025-10-01"), RoomType::Quad)
                    .with_special_requests("near the library"),
            )
            .unwrap()
    };

    let manager = BookingManager::new(FileStore::open(tmp.path()).unwrap());
    assert_eq!(manager.list_bookings().unwrap(), vec![booking]);
    let favorites: Vec<_> = manager
        .list_favorite_listings(&catalog)
        .unwrap()
        .iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(favorites, vec![3]);
}

#[test]
fn corrupt_files_recover_as_empty() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("bookings.json"), "[{\"id\": ").unwrap();
    std::fs::write(tmp.path().join("favorites.json"), "null").unwrap();

    let catalog = Catalog::builtin();
    let mut manager = BookingManager::with_clock(FileStore::open(tmp.path()).unwrap(), clock());
    assert!(manager.list_bookings().unwrap().is_empty());
    assert!(manager.list_favorite_listings(&catalog).unwrap().is_empty());

    let booking = manager
        .create_booking(
            catalog.get(1).unwrap(),
            BookingRequest::new(date("2025-07-01"), date("2025-07-31"), RoomType::Double),
        )
        .unwrap();
    assert_eq!(booking.total_amount, 8000);

    let raw = manager.store().backend().get(BOOKINGS_KEY).unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
    assert_eq!(parsed[0]["listingName"], "Campus View Hostel");
    assert_eq!(parsed[0]["status"], "pending");
}

#[test]
fn non_utf8_files_recover_as_empty() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("bookings.json"), [0xFF, 0xFE, 0x5B, 0x5D]).unwrap();
    std::fs::write(tmp.path().join("favorites.json"), [0xC3, 0x28]).unwrap();

    let catalog = Catalog::builtin();
    let mut manager = BookingManager::with_clock(FileStore::open(tmp.path()).unwrap(), clock());
    assert!(manager.list_bookings().unwrap().is_empty());
    assert!(!manager.is_favorite(1).unwrap());

    let booking = manager
        .create_booking(
            catalog.get(2).unwrap(),
            BookingRequest::new(date("2025-07-01"), date("2025-07-31"), RoomType::Single),
        )
        .unwrap();
    assert_eq!(manager.list_bookings().unwrap(), vec![booking]);
    assert!(manager.toggle_favorite(1).unwrap().added);
}

#[test]
fn dangling_listing_ids_are_tolerated() {
    let mut backend = MemoryStore::new();
    backend.set(FAVORITES_KEY, "[42, 2]".to_string()).unwrap();
    backend
        .set(
            BOOKINGS_KEY,
            r#"[{"id": 1, "listingId": 42, "listingName": "Demolished Hall",
                "checkIn": "2024-01-01", "checkOut": "2024-02-01", "roomType": "single",
                "totalAmount": 5167, "status": "pending",
                "createdAt": "2024-01-01T00:00:00Z"}]"#
                .to_string(),
        )
        .unwrap();

    let catalog = Catalog::builtin();
    let mut manager = BookingManager::with_clock(backend, clock());

    let favorites = manager.list_favorite_listings(&catalog).unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, 2);

    let bookings = manager.list_bookings().unwrap();
    assert_eq!(bookings[0].listing_name, "Demolished Hall");
    manager.cancel_booking(1).unwrap();
}
