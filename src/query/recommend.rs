//! Weighted nearest-neighbour recommendations over the catalog
//!
//! Every listing becomes a feature vector (distance, price, rating and one
//! 0/1 flag per catalog amenity). Each feature is min-max scaled over the
//! catalog, and the student's preferences are scaled the same way after being
//! clipped to the observed range. Listings are ranked by weighted Euclidean
//! distance to that target.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::models::Listing;

const TOP_MATCHES: usize = 3;
const SHORTFALL_BELOW: f64 = 0.5;

/// What a student is looking for
///
/// Numeric fields are targets, not hard limits. An unset field falls back to
/// the catalog median, so it neither helps nor hurts any listing much.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub distance_km: Option<f64>,
    pub monthly_budget: Option<u32>,
    pub rating: Option<f64>,
    /// Amenities that should be present
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    /// Amenities that should be absent
    #[serde(default)]
    pub excluded_amenities: BTreeSet<String>,
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distance_km(mut self, km: f64) -> Self {
        self.distance_km = Some(km);
        self
    }

    pub fn with_monthly_budget(mut self, budget: u32) -> Self {
        self.monthly_budget = Some(budget);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_amenity(mut self, amenity: impl Into<String>) -> Self {
        let amenity = amenity.into();
        self.excluded_amenities.remove(&amenity);
        self.amenities.insert(amenity);
        self
    }

    pub fn without_amenity(mut self, amenity: impl Into<String>) -> Self {
        let amenity = amenity.into();
        self.amenities.remove(&amenity);
        self.excluded_amenities.insert(amenity);
        self
    }
}

/// Relative importance of each feature
///
/// Weights are normalised to sum to one before ranking, so only their ratios
/// matter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeights {
    pub distance: f64,
    pub price: f64,
    pub rating: f64,
    /// Amenities named in the preferences, wanted or excluded
    pub mentioned_amenity: f64,
    /// Every other amenity column
    pub other_amenity: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            distance: 0.25,
            price: 0.20,
            rating: 0.10,
            mentioned_amenity: 0.05,
            other_amenity: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Feature {
    Distance,
    Price,
    Rating,
    Amenity(String),
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Distance => f.write_str("Within distance limit"),
            Feature::Price => f.write_str("Matches your budget"),
            Feature::Rating => f.write_str("Well rated"),
            Feature::Amenity(name) => write!(f, "Has {name}"),
        }
    }
}

/// How closely one feature of a listing matches the target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMatch {
    pub feature: Feature,
    /// `1 - |listing - target|` on the scaled axis, in `[0, 1]`
    pub similarity: f64,
    /// `similarity` times the normalised weight
    pub contribution: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Explanation {
    /// Strongest contributions, best first
    pub top_matches: Vec<FeatureMatch>,
    /// Features the student asked about that match poorly
    pub shortfalls: Vec<FeatureMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation<'a> {
    pub listing: &'a Listing,
    /// Weighted distance to the target; smaller is better
    pub distance: f64,
    /// `1 / (1 + distance)`, in `(0, 1]`
    pub match_score: f64,
    pub explanation: Explanation,
}

/// The `k` listings closest to `preferences`, best first
///
/// Ties keep catalog order. `k` larger than the catalog returns every listing.
pub fn recommend<'a>(
    catalog: &'a Catalog,
    preferences: &Preferences,
    k: usize,
) -> Vec<Recommendation<'a>> {
    recommend_with_weights(catalog, preferences, &FeatureWeights::default(), k)
}

pub fn recommend_with_weights<'a>(
    catalog: &'a Catalog,
    preferences: &Preferences,
    weights: &FeatureWeights,
    k: usize,
) -> Vec<Recommendation<'a>> {
    let columns = columns(catalog, preferences, weights);
    let total_weight: f64 = columns.iter().map(|c| c.weight).sum();
    if k == 0 || total_weight.is_nan() || total_weight <= 0.0 {
        return Vec::new();
    }

    let target: Vec<f64> = columns.iter().map(|c| c.scale(c.target)).collect();

    let mut ranked: Vec<Recommendation<'a>> = catalog
        .iter()
        .map(|listing| {
            let row: Vec<f64> = columns
                .iter()
                .map(|c| c.scale(raw_value(&c.feature, listing)))
                .collect();
            let distance = columns
                .iter()
                .zip(row.iter().zip(&target))
                .map(|(c, (x, u))| c.weight / total_weight * (x - u).powi(2))
                .sum::<f64>()
                .sqrt();

            Recommendation {
                listing,
                distance,
                match_score: 1.0 / (1.0 + distance),
                explanation: explain(&columns, &row, &target, total_weight),
            }
        })
        .collect();

    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.truncate(k);

    debug!(
        "recommend k={} over {} features returned {:?}",
        k,
        columns.len(),
        ranked.iter().map(|r| r.listing.id).collect::<Vec<_>>()
    );
    ranked
}

/// One feature axis fitted to the catalog
struct Column {
    feature: Feature,
    weight: f64,
    min: f64,
    max: f64,
    target: f64,
    /// Target came from the preferences rather than the median
    requested: bool,
}

impl Column {
    fn scale(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 {
            (value.clamp(self.min, self.max) - self.min) / span
        } else {
            0.0
        }
    }
}

fn columns(catalog: &Catalog, preferences: &Preferences, weights: &FeatureWeights) -> Vec<Column> {
    let mut features = vec![
        (Feature::Distance, weights.distance, preferences.distance_km),
        (
            Feature::Price,
            weights.price,
            preferences.monthly_budget.map(f64::from),
        ),
        (Feature::Rating, weights.rating, preferences.rating),
    ];

    let amenities = catalog.amenities();
    for amenity in &amenities {
        let (weight, target) = if preferences.amenities.contains(*amenity) {
            (weights.mentioned_amenity, Some(1.0))
        } else if preferences.excluded_amenities.contains(*amenity) {
            (weights.mentioned_amenity, Some(0.0))
        } else {
            (weights.other_amenity, None)
        };
        features.push((Feature::Amenity(amenity.to_string()), weight, target));
    }

    for unknown in preferences
        .amenities
        .iter()
        .chain(&preferences.excluded_amenities)
        .filter(|a| !amenities.contains(&a.as_str()))
    {
        debug!("Ignoring amenity {:?} that no listing offers", unknown);
    }

    features
        .into_iter()
        .map(|(feature, weight, target)| {
            let values: Vec<f64> = catalog.iter().map(|l| raw_value(&feature, l)).collect();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            Column {
                requested: target.is_some(),
                target: target.unwrap_or_else(|| median(&values)),
                feature,
                weight,
                min,
                max,
            }
        })
        .collect()
}

fn raw_value(feature: &Feature, listing: &Listing) -> f64 {
    match feature {
        Feature::Distance => listing.distance_km,
        Feature::Price => f64::from(listing.monthly_price),
        Feature::Rating => listing.rating,
        Feature::Amenity(name) => {
            if listing.has_amenity(name) {
                1.0
            } else {
                0.0
            }
        }
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 0 => (sorted[mid - 1] + sorted[mid]) / 2.0,
        _ => sorted[mid],
    }
}

fn explain(columns: &[Column], row: &[f64], target: &[f64], total_weight: f64) -> Explanation {
    let matches: Vec<(bool, FeatureMatch)> = columns
        .iter()
        .zip(row.iter().zip(target))
        .map(|(c, (x, u))| {
            let similarity = 1.0 - (x - u).abs();
            let feature_match = FeatureMatch {
                feature: c.feature.clone(),
                similarity,
                contribution: similarity * c.weight / total_weight,
            };
            (c.requested, feature_match)
        })
        .collect();

    let shortfalls = matches
        .iter()
        .filter(|(requested, m)| *requested && m.similarity < SHORTFALL_BELOW)
        .map(|(_, m)| m.clone())
        .collect();

    let mut top_matches: Vec<FeatureMatch> = matches.into_iter().map(|(_, m)| m).collect();
    top_matches.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
    top_matches.truncate(TOP_MATCHES);

    Explanation {
        top_matches,
        shortfalls,
    }
}
