//! Keyword extraction of recommendation preferences from free text
//!
//! "within 1.5 km, budget around 6k, must have wifi, no gym" becomes a
//! [`Preferences`] with a distance target, a budget target, one wanted and one
//! excluded amenity. Anything not mentioned stays unset.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use super::recommend::Preferences;

/// Targets outside these ranges are treated as misreadings and dropped
const DISTANCE_RANGE_KM: std::ops::RangeInclusive<f64> = 0.0..=20.0;
const BUDGET_RANGE: std::ops::RangeInclusive<u32> = 500..=20_000;

lazy_static! {
    static ref CURRENCY_RE: Regex = Regex::new(r"₹|\brs\b\.?|\brupees\b").unwrap();
    static ref UNIT_RE: Regex = Regex::new(r"\b(?:kilometers?|kilometres?|kms)\b").unwrap();
    static ref THOUSANDS_RE: Regex = Regex::new(r"\b(\d+)k\b").unwrap();

    static ref KM_RE: Regex = Regex::new(r"(\d+(?:\.\d+)?)\s*km\b").unwrap();
    static ref METRES_RE: Regex = Regex::new(r"(\d+)\s*(?:m|metres|meters)\b").unwrap();

    static ref RENT_WORDS_RE: Regex = Regex::new(
        r"\b(?:rent|budget|price|cost|monthly|per month|affordable|cheap|expensive|premium|fee)\b"
    )
    .unwrap();
    static ref RENT_RANGE_RE: Regex =
        Regex::new(r"(\d{3,6})\s*(?:and|to|-)\s*(\d{3,6})").unwrap();
    static ref RENT_BOUND_RE: Regex = Regex::new(
        r"(?:under|below|less than|max(?:imum)?|budget(?: of)?|around|approximately|upto|up to)\s*(\d{3,6})"
    )
    .unwrap();
    static ref RENT_SUFFIX_RE: Regex =
        Regex::new(r"(\d{3,6})\s*(?:per month|monthly|budget|rent)").unwrap();
    static ref BARE_AMOUNT_RE: Regex = Regex::new(r"\b(\d{3,6})\b").unwrap();

    static ref RATING_WORDS_RE: Regex =
        Regex::new(r"\b(?:rating|rated|stars?|reviews?)\b").unwrap();
    static ref RATING_AFTER_RE: Regex = Regex::new(
        r"\b(?:rating|rated)\s*(?:above|over|at least|min(?:imum)?|more than|of)?\s*(\d(?:\.\d+)?)\b"
    )
    .unwrap();
    static ref RATING_BEFORE_RE: Regex =
        Regex::new(r"\b(\d(?:\.\d+)?)\s*\+?\s*(?:stars?|rating|rated)\b").unwrap();

    static ref AMENITY_PATTERNS: Vec<AmenityPattern> = vec![
        AmenityPattern::new("WiFi", r"wifi|wi-fi|internet|broadband|wireless"),
        AmenityPattern::new("Mess", r"food|mess|meals?|dining|cafeteria|breakfast|lunch|dinner"),
        AmenityPattern::new("Security", r"cctv|cameras?|surveillance|security|guards?"),
        AmenityPattern::new("AC", r"ac|a/c|air[- ]?condition(?:ed|ing|er)?"),
        AmenityPattern::new("Gym", r"gym|fitness|workout"),
        AmenityPattern::new("Laundry", r"laundry|washing machine"),
        AmenityPattern::new("Parking", r"parking"),
        AmenityPattern::new("Library", r"library"),
    ];
}

/// Keyword family for one catalog amenity
struct AmenityPattern {
    amenity: &'static str,
    mentioned: Regex,
    negated: Regex,
}

impl AmenityPattern {
    fn new(amenity: &'static str, keywords: &str) -> Self {
        let mentioned = format!(r"\b(?:{keywords})\b");
        let negated = format!(
            r"\b(?:no|without|dont need|don't need|not required)\s+(?:{keywords})\b|\b(?:{keywords})\s+(?:not required|not needed|optional)\b"
        );
        Self {
            amenity,
            mentioned: Regex::new(&mentioned).unwrap(),
            negated: Regex::new(&negated).unwrap(),
        }
    }
}

/// Read recommendation preferences out of a free-text request
pub fn parse_preferences(text: &str) -> Preferences {
    let text = normalize(text);
    let mut preferences = Preferences::new();

    preferences.distance_km = extract_distance(&text).filter(|km| {
        let ok = DISTANCE_RANGE_KM.contains(km);
        if !ok {
            warn!("Ignoring unusual distance {} km", km);
        }
        ok
    });
    preferences.monthly_budget = extract_budget(&text).filter(|budget| {
        let ok = BUDGET_RANGE.contains(budget);
        if !ok {
            warn!("Ignoring unusual budget {}", budget);
        }
        ok
    });
    preferences.rating = extract_rating(&text);

    for pattern in AMENITY_PATTERNS.iter() {
        if pattern.negated.is_match(&text) {
            preferences = preferences.without_amenity(pattern.amenity);
        } else if pattern.mentioned.is_match(&text) {
            preferences = preferences.with_amenity(pattern.amenity);
        }
    }

    debug!("Parsed {:?} into {:?}", text, preferences);
    preferences
}

/// Lowercase, strip currency, unify distance units and expand `5k` to `5000`
fn normalize(text: &str) -> String {
    let text = text.to_lowercase();
    let text = CURRENCY_RE.replace_all(&text, "");
    let text = UNIT_RE.replace_all(&text, "km");
    let text = THOUSANDS_RE.replace_all(&text, "${1}000");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_distance(text: &str) -> Option<f64> {
    if let Some(km) = capture(&KM_RE, text).and_then(|s| s.parse::<f64>().ok()) {
        return Some(km);
    }
    if let Some(metres) = capture(&METRES_RE, text).and_then(|s| s.parse::<f64>().ok()) {
        return Some(metres / 1000.0);
    }

    if mentions_any(text, &["very near", "walking distance", "very close"]) {
        Some(1.0)
    } else if mentions_any(text, &["nearby", "near campus", "close to campus"]) {
        Some(2.0)
    } else if text.split(|c: char| !c.is_alphanumeric()).any(|w| w == "far" || w == "distant") {
        Some(5.0)
    } else {
        None
    }
}

/// Budget target; a range resolves to its midpoint
fn extract_budget(text: &str) -> Option<u32> {
    if !RENT_WORDS_RE.is_match(text) {
        return None;
    }

    if let Some(caps) = RENT_RANGE_RE.captures(text) {
        let lo: u32 = caps[1].parse().ok()?;
        let hi: u32 = caps[2].parse().ok()?;
        return Some(lo.min(hi) + lo.abs_diff(hi) / 2);
    }

    let amount = [&*RENT_BOUND_RE, &*RENT_SUFFIX_RE, &*BARE_AMOUNT_RE]
        .into_iter()
        .find_map(|re| capture(re, text))
        .and_then(|s| s.parse::<u32>().ok());
    if amount.is_some() {
        return amount;
    }

    if mentions_any(text, &["cheap", "affordable", "low budget"]) {
        Some(3000)
    } else if mentions_any(text, &["expensive", "premium", "high budget"]) {
        Some(8000)
    } else {
        None
    }
}

fn extract_rating(text: &str) -> Option<f64> {
    if !RATING_WORDS_RE.is_match(text) {
        return None;
    }

    let explicit = [&*RATING_AFTER_RE, &*RATING_BEFORE_RE]
        .into_iter()
        .find_map(|re| capture(re, text))
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|rating| (0.0..=5.0).contains(rating));
    if explicit.is_some() {
        return explicit;
    }

    if mentions_any(text, &["high", "very", "excellent", "great", "top"]) {
        Some(4.5)
    } else if mentions_any(text, &["good", "decent", "okay"]) {
        Some(3.5)
    } else if mentions_any(text, &["low", "poor", "bad"]) {
        Some(1.5)
    } else {
        None
    }
}

fn mentions_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
