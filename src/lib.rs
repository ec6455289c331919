//! Listing discovery and booking engine for the Havenly demo site
//!
//! - [`catalog`]: the read-only listing catalog
//! - [`query`]: search, filters and sort order over the catalog, plus
//!   preference-based recommendations
//! - [`booking`]: stay pricing and the bookings/favorites manager
//! - [`store`]: key-value persistence behind a typed adapter

pub mod booking;
pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod query;
pub mod store;

pub use booking::{compute_booking, BookingManager, BookingQuote, FavoriteToggle};
pub use catalog::Catalog;
pub use config::Config;
pub use error::{BookingError, CatalogError, ConfigError, StoreError};
pub use models::{Booking, BookingRequest, BookingStatus, Listing, RoomType};
pub use query::{parse_preferences, recommend, search, Preferences, SearchCriteria, SortKey};
