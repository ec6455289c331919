//! Error types for the booking engine
//!
//! Every failure the core can produce is a value of one of these enums:
//! - Booking lifecycle failures ([`BookingError`])
//! - Key-value backend and serialization failures ([`StoreError`])
//! - Catalog seeding failures ([`CatalogError`])
//! - Environment configuration failures ([`ConfigError`])

use chrono::NaiveDate;

use crate::models::{BookingId, ListingId};

/// Errors returned by the booking calculator and the booking/favorites manager
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// Check-out does not strictly follow check-in
    #[error("invalid date range: check-out {check_out} must be after check-in {check_in}")]
    InvalidDateRange {
        /// Requested check-in date
        check_in: NaiveDate,
        /// Requested check-out date
        check_out: NaiveDate,
    },

    /// No booking with this id exists in the store
    #[error("booking #{0} not found")]
    NotFound(BookingId),

    /// The booking has already reached its terminal state
    #[error("booking #{0} is already cancelled")]
    AlreadyTerminal(BookingId),

    /// The backing store failed; persisted state is unchanged
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors raised by key-value backends and the typed store adapter
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Key cannot be used by the backend
    #[error("invalid store key {0:?}")]
    InvalidKey(String),

    /// Filesystem failure while reading or writing a key
    #[error("i/o error on key {key:?}: {source}")]
    Io {
        /// Key being accessed
        key: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stored collection failed to deserialize
    #[error("corrupt data under key {key:?}: {source}")]
    CorruptStoreData {
        /// Key holding the bad value
        key: String,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// Collection failed to serialize
    #[error("failed to serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised while building or loading a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog contains no listings")]
    Empty,

    #[error("duplicate listing id {0}")]
    DuplicateId(ListingId),

    #[error("listing {id} is invalid: {reason}")]
    InvalidListing { id: ListingId, reason: &'static str },

    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while reading configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is set but empty")]
    Empty(&'static str),

    #[error("environment variable {0} is not valid unicode")]
    NotUnicode(&'static str),
}

/// A textual option value that does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseValueError {
    /// What was being parsed (e.g. "room type")
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl ParseValueError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
