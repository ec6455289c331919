mod booking;
mod listing;

pub use booking::{Booking, BookingRequest, BookingStatus, RoomType};
pub use listing::{Listing, CONTACT_PHONE};

/// Identifier of a listing in the catalog
pub type ListingId = u32;

/// Identifier of a booking, derived from its creation time in milliseconds
pub type BookingId = i64;
