use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseValueError;

/// Result ordering for a search
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Catalog order
    #[default]
    None,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    DistanceAsc,
}

impl SortKey {
    /// Option value used by the listing page's sort selector
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "default",
            Self::PriceAsc => "price-low",
            Self::PriceDesc => "price-high",
            Self::RatingDesc => "rating",
            Self::DistanceAsc => "distance",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "default" | "none" => Ok(Self::None),
            "price-low" | "price-asc" => Ok(Self::PriceAsc),
            "price-high" | "price-desc" => Ok(Self::PriceDesc),
            "rating" => Ok(Self::RatingDesc),
            "distance" => Ok(Self::DistanceAsc),
            other => Err(ParseValueError::new("sort key", other)),
        }
    }
}

/// Search criteria for the listing page
///
/// Every field defaults to "match everything".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
    /// Case-insensitive substring over name, location and amenities
    pub text: String,
    /// Maximum monthly price, inclusive
    pub max_price: Option<u32>,
    /// Maximum distance in km, inclusive; `None` means no limit
    pub max_distance_km: Option<f64>,
    /// Amenities a listing must all have
    pub required_amenities: BTreeSet<String>,
    pub sort: SortKey,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_max_price(mut self, max_price: u32) -> Self {
        self.max_price = Some(max_price);
        self
    }

    pub fn with_max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_km = Some(km);
        self
    }

    pub fn with_amenity(mut self, amenity: impl Into<String>) -> Self {
        self.required_amenities.insert(amenity.into());
        self
    }

    pub fn sorted_by(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

/// Parse the distance selector; `all` means no limit
pub fn parse_distance_limit(value: &str) -> Result<Option<f64>, ParseValueError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(km) if km >= 0.0 => Ok(Some(km)),
        _ => Err(ParseValueError::new("distance limit", value)),
    }
}
