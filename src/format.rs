//! Display helpers shared by front ends

use chrono::NaiveDate;

use crate::booking::BookingQuote;
use crate::models::{Listing, CONTACT_PHONE};

/// Icon shown next to an amenity name
pub fn amenity_icon(amenity: &str) -> &'static str {
    match amenity {
        "WiFi" => "📶",
        "Mess" => "🍽️",
        "AC" => "❄️",
        "Gym" => "💪",
        "Pool" | "Swimming Pool" => "🏊",
        "Laundry" => "🧺",
        "Study Room" | "Study Hall" => "📚",
        "Library" => "📖",
        "Parking" => "🚗",
        "Security" => "🔒",
        "Common Room" | "Common Area" => "🛋️",
        "Spa" => "💆",
        "Cafe" => "☕",
        "Gaming Room" => "🎮",
        _ => "✓",
    }
}

/// Rupee amount with Indian digit grouping, e.g. `₹1,20,000`
pub fn format_rupees(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("₹{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("₹{},{}", groups.join(","), tail)
}

/// e.g. `1 Jan 2025`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Booking summary line, e.g. `45 days (~1.5 months)`
pub fn duration_summary(quote: &BookingQuote) -> String {
    format!(
        "{} days (~{:.1} months)",
        quote.duration_days,
        quote.approx_months()
    )
}

pub fn contact_line(listing: &Listing) -> String {
    format!("Phone: {} | Email: {}", CONTACT_PHONE, listing.contact_email())
}
