use serde::{Deserialize, Serialize};

use super::ListingId;

/// Phone number shown on every listing's contact card
pub const CONTACT_PHONE: &str = "+91 98765 43210";

/// A bookable property in the catalog
///
/// Field names on the wire match the catalog asset format (`location`,
/// `distance`, `price`, `image`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    #[serde(rename = "location")]
    pub location_label: String,
    #[serde(rename = "distance")]
    pub distance_km: f64,
    /// Monthly rent in whole currency units
    #[serde(rename = "price")]
    pub monthly_price: u32,
    pub amenities: Vec<String>,
    pub rating: f64,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "image", default)]
    pub image_url: String,
}

impl Listing {
    /// Exact, case-sensitive amenity membership
    pub fn has_amenity(&self, amenity: &str) -> bool {
        self.amenities.iter().any(|a| a == amenity)
    }

    /// Contact address derived from the listing name, e.g.
    /// `campusviewhostel@havenly.com`
    pub fn contact_email(&self) -> String {
        let local: String = self
            .name
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        format!("{local}@havenly.com")
    }
}
