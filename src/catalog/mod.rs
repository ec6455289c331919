//! Read-only listing catalog
//!
//! The catalog is the ground truth for every query. It is validated once on
//! construction and never mutated afterwards.

mod seed;

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use crate::error::CatalogError;
use crate::models::{Listing, ListingId};

/// Validated, immutable set of listings in their canonical order
#[derive(Debug, Clone)]
pub struct Catalog {
    listings: Vec<Listing>,
}

impl Catalog {
    /// Build a catalog, checking id uniqueness and per-listing sanity
    pub fn new(listings: Vec<Listing>) -> Result<Self, CatalogError> {
        validate_all(&listings)?;
        debug!("Catalog built with {} listings", listings.len());
        Ok(Self { listings })
    }

    /// The six hostels shipped with the site
    ///
    /// Seed listings go through the same checks as `new`; a failure trips a
    /// debug assertion.
    pub fn builtin() -> Self {
        let listings = seed::listings();
        let checked = validate_all(&listings);
        debug_assert!(checked.is_ok(), "built-in catalog is invalid: {checked:?}");
        Self { listings }
    }

    /// Parse a catalog from a JSON array of listings
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let listings: Vec<Listing> = serde_json::from_str(text)?;
        Self::new(listings)
    }

    /// Load a catalog asset from disk
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&text)?;
        info!("Loaded {} listings from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Detail lookup by id
    pub fn get(&self, id: ListingId) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Listing> {
        self.listings.iter()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Distinct amenities across the catalog in first-seen order
    pub fn amenities(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.listings
            .iter()
            .flat_map(|l| l.amenities.iter())
            .map(String::as_str)
            .filter(|a| seen.insert(*a))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Listing;
    type IntoIter = std::slice::Iter<'a, Listing>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate_all(listings: &[Listing]) -> Result<(), CatalogError> {
    if listings.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut seen = HashSet::with_capacity(listings.len());
    for listing in listings {
        validate(listing)?;
        if !seen.insert(listing.id) {
            return Err(CatalogError::DuplicateId(listing.id));
        }
    }
    Ok(())
}

fn validate(listing: &Listing) -> Result<(), CatalogError> {
    let invalid = |reason| CatalogError::InvalidListing {
        id: listing.id,
        reason,
    };

    if listing.id == 0 {
        return Err(invalid("id must be positive"));
    }
    if listing.monthly_price == 0 {
        return Err(invalid("monthly price must be positive"));
    }
    if listing.distance_km.is_nan() || listing.distance_km < 0.0 {
        return Err(invalid("distance must be a non-negative number"));
    }
    if !(0.0..=5.0).contains(&listing.rating) {
        return Err(invalid("rating must be within 0 to 5"));
    }
    Ok(())
}
