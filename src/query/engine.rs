use std::cmp::Ordering;

use tracing::debug;

use super::types::{SearchCriteria, SortKey};
use crate::catalog::Catalog;
use crate::models::Listing;

/// Filter and order the catalog
///
/// Filtering is the conjunction of the text, price, distance and amenity
/// predicates. Sorting is stable, so equal keys keep catalog order. An empty
/// result is not an error.
pub fn search<'a>(catalog: &'a Catalog, criteria: &SearchCriteria) -> Vec<&'a Listing> {
    let needle = criteria.text.to_lowercase();

    let mut results: Vec<&Listing> = catalog
        .iter()
        .filter(|listing| matches_text(listing, &needle))
        .filter(|listing| matches_price(listing, criteria.max_price))
        .filter(|listing| matches_distance(listing, criteria.max_distance_km))
        .filter(|listing| matches_amenities(listing, criteria))
        .collect();

    if let Some(compare) = comparator(criteria.sort) {
        results.sort_by(|a, b| compare(a, b));
    }

    debug!(
        "search text={:?} sort={} matched {}/{}",
        criteria.text,
        criteria.sort,
        results.len(),
        catalog.len()
    );
    results
}

/// `needle` must already be lowercased
fn matches_text(listing: &Listing, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    listing.name.to_lowercase().contains(needle)
        || listing.location_label.to_lowercase().contains(needle)
        || listing
            .amenities
            .iter()
            .any(|a| a.to_lowercase().contains(needle))
}

fn matches_price(listing: &Listing, max_price: Option<u32>) -> bool {
    max_price.map_or(true, |max| listing.monthly_price <= max)
}

fn matches_distance(listing: &Listing, max_km: Option<f64>) -> bool {
    max_km.map_or(true, |max| listing.distance_km <= max)
}

fn matches_amenities(listing: &Listing, criteria: &SearchCriteria) -> bool {
    criteria
        .required_amenities
        .iter()
        .all(|amenity| listing.has_amenity(amenity))
}

fn comparator(sort: SortKey) -> Option<fn(&Listing, &Listing) -> Ordering> {
    let compare: fn(&Listing, &Listing) -> Ordering = match sort {
        SortKey::None => return None,
        SortKey::PriceAsc => |a, b| a.monthly_price.cmp(&b.monthly_price),
        SortKey::PriceDesc => |a, b| b.monthly_price.cmp(&a.monthly_price),
        SortKey::RatingDesc => |a, b| b.rating.total_cmp(&a.rating),
        SortKey::DistanceAsc => |a, b| a.distance_km.total_cmp(&b.distance_km),
    };
    Some(compare)
}
