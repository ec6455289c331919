use crate::models::Listing;

#[allow(clippy::too_many_arguments)]
fn listing(
    id: u32,
    name: &str,
    distance_km: f64,
    monthly_price: u32,
    image: &str,
    amenities: &[&str],
    rating: f64,
    description: &str,
) -> Listing {
    Listing {
        id,
        name: name.to_string(),
        location_label: format!("{distance_km:.1} km from campus"),
        distance_km,
        monthly_price,
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
        rating,
        description: description.to_string(),
        image_url: format!("https://images.unsplash.com/{image}?w=800"),
    }
}

/// Seed listings for the demo site
pub(super) fn listings() -> Vec<Listing> {
    vec![
        listing(
            1,
            "Campus View Hostel",
            0.5,
            8000,
            "photo-1555854877-bab0e564b8d5",
            &["WiFi", "Mess", "AC", "Laundry", "Study Room", "Parking"],
            4.5,
            "Campus View Hostel offers premium accommodation for students with modern \
             amenities and excellent connectivity to the campus. Spacious rooms, \
             high-speed WiFi and nutritious meals.",
        ),
        listing(
            2,
            "Green Valley Residence",
            1.2,
            6500,
            "photo-1522708323590-d24dbb6b0267",
            &["WiFi", "Mess", "Gym", "Common Room", "Security"],
            4.2,
            "Green Valley Residence provides comfortable living spaces in a peaceful \
             environment with well-maintained facilities.",
        ),
        listing(
            3,
            "Elite Student Housing",
            0.8,
            10000,
            "photo-1502672260266-1c1ef2d93688",
            &["WiFi", "Mess", "AC", "Gym", "Swimming Pool", "Library"],
            4.8,
            "Elite Student Housing offers air-conditioned rooms, a modern gym, a \
             swimming pool and dedicated study areas.",
        ),
        listing(
            4,
            "Budget Stay Hostel",
            2.0,
            5000,
            "photo-1631049307264-da0ec9d70304",
            &["WiFi", "Mess", "Common Area", "Security"],
            3.9,
            "Budget Stay Hostel offers affordable accommodation with the essential \
             amenities and a friendly community atmosphere.",
        ),
        listing(
            5,
            "Premium Scholars Den",
            1.5,
            12000,
            "photo-1564013799919-ab600027ffc6",
            &["WiFi", "Mess", "AC", "Gym", "Pool", "Spa", "Cafe", "Gaming Room"],
            4.9,
            "Premium Scholars Den is a luxury student residence with a spa, gaming \
             room and café.",
        ),
        listing(
            6,
            "Comfort Inn Lodge",
            0.3,
            7500,
            "photo-1540518614846-7eded433c457",
            &["WiFi", "Mess", "Laundry", "Study Hall", "Parking"],
            4.3,
            "Comfort Inn Lodge is the closest hostel to campus, with well-furnished \
             rooms and quality meals.",
        ),
    ]
}
