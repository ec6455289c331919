use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{BookingId, ListingId};
use crate::error::{BookingError, ParseValueError};

/// Room configuration requested for a stay
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Single,
    Double,
    Triple,
    Quad,
}

impl RoomType {
    pub const ALL: [RoomType; 4] = [Self::Single, Self::Double, Self::Triple, Self::Quad];

    /// Stored form, as used in serialized bookings
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Triple => "triple",
            Self::Quad => "quad",
        }
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Single => "Single Room",
            Self::Double => "Double Sharing",
            Self::Triple => "Triple Sharing",
            Self::Quad => "Quad Sharing",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|room| room.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseValueError::new("room type", s))
    }
}

/// Lifecycle state of a booking
///
/// `Pending -> Cancelled` is the only transition; `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub room_type: RoomType,
    pub special_requests: Option<String>,
}

impl BookingRequest {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate, room_type: RoomType) -> Self {
        Self {
            check_in,
            check_out,
            room_type,
            special_requests: None,
        }
    }

    /// Attach free-text requests; blank text is dropped
    pub fn with_special_requests(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.special_requests = (!text.trim().is_empty()).then_some(text);
        self
    }
}

/// A reservation against a listing
///
/// `total_amount` is fixed at creation and `listing_name` is a snapshot, so
/// a booking stays displayable even if its listing leaves the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    #[serde(alias = "hostelId")]
    pub listing_id: ListingId,
    #[serde(alias = "hostelName")]
    pub listing_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub room_type: RoomType,
    #[serde(
        default,
        deserialize_with = "non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub special_requests: Option<String>,
    pub total_amount: u64,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(alias = "bookedAt")]
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Move a pending booking to `Cancelled`
    pub(crate) fn cancel(&mut self) -> Result<(), BookingError> {
        if self.status.is_terminal() {
            return Err(BookingError::AlreadyTerminal(self.id));
        }
        self.status = BookingStatus::Cancelled;
        Ok(())
    }
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
