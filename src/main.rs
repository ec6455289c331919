use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use havenly::format::{
    amenity_icon, contact_line, duration_summary, format_date, format_rupees,
};
use havenly::models::ListingId;
use havenly::query::{parse_distance_limit, Recommendation};
use havenly::store::{FileStore, KeyValueStore, MemoryStore};
use havenly::{
    compute_booking, parse_preferences, recommend, search, Booking, BookingManager,
    BookingRequest, BookingStatus, Catalog, Config, Listing, RoomType, SearchCriteria, SortKey,
};

#[derive(Parser)]
#[command(name = "havenly", version, about = "Browse and book student hostels")]
struct Cli {
    /// Profile directory holding favorites and bookings
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    /// JSON catalog to use instead of the built-in listings
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Keep state in memory only for this run
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filter and sort listings
    Search {
        /// Matches name, location or amenity
        #[arg(long, default_value = "")]
        text: String,
        #[arg(long)]
        max_price: Option<u32>,
        /// Kilometres, or `all`
        #[arg(long)]
        max_distance: Option<String>,
        /// Required amenity; repeat for several
        #[arg(long = "amenity")]
        amenities: Vec<String>,
        /// default, price-low, price-high, rating or distance
        #[arg(long, default_value = "default")]
        sort: SortKey,
    },
    /// Rank listings against your preferences
    Recommend {
        /// Free-text request, e.g. "within 1 km, budget 7k, need wifi"
        #[arg(default_value = "")]
        query: String,
        /// Target distance in kilometres
        #[arg(long)]
        distance: Option<f64>,
        /// Target monthly rent
        #[arg(long)]
        budget: Option<u32>,
        #[arg(long)]
        rating: Option<f64>,
        /// Wanted amenity; repeat for several
        #[arg(long = "amenity")]
        amenities: Vec<String>,
        /// Amenity to avoid; repeat for several
        #[arg(long = "without")]
        excluded: Vec<String>,
        /// Number of listings to show
        #[arg(long, short = 'k', default_value_t = 3)]
        top: usize,
    },
    /// Show one listing in detail
    Show { id: ListingId },
    /// Price a stay without booking it
    Quote {
        id: ListingId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    /// Book a listing
    Book {
        id: ListingId,
        #[arg(long)]
        check_in: NaiveDate,
        #[arg(long)]
        check_out: NaiveDate,
        /// single, double, triple or quad
        #[arg(long)]
        room: RoomType,
        #[arg(long, default_value = "")]
        requests: String,
    },
    /// Cancel a pending booking
    Cancel {
        booking_id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// List bookings, newest first
    Bookings,
    /// Add or remove a listing from favorites
    Favorite { id: ListingId },
    /// Remove a listing from favorites
    Unfavorite { id: ListingId },
    /// List favorite listings
    Favorites,
    /// Write the catalog as JSON
    ExportCatalog { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("Invalid environment configuration")?;
    if let Some(dir) = cli.store_dir.clone() {
        config.store_dir = dir;
    }
    if let Some(path) = cli.catalog.clone() {
        config.catalog_path = Some(path);
    }

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!("Using configuration {:?}", config);

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => Catalog::builtin(),
    };

    let backend: Box<dyn KeyValueStore> = if cli.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        Box::new(FileStore::open(&config.store_dir).context("Failed to open profile store")?)
    };
    let mut manager = BookingManager::new(backend);

    match cli.command {
        Command::Search {
            text,
            max_price,
            max_distance,
            amenities,
            sort,
        } => {
            let mut criteria = SearchCriteria::new().with_text(text).sorted_by(sort);
            criteria.max_price = max_price;
            if let Some(limit) = max_distance {
                criteria.max_distance_km = parse_distance_limit(&limit)?;
            }
            criteria.required_amenities.extend(amenities);

            let results = search(&catalog, &criteria);
            if results.is_empty() {
                println!("No hostels found");
            }
            for (i, listing) in results.iter().enumerate() {
                print_card(i + 1, listing);
            }
        }
        Command::Recommend {
            query,
            distance,
            budget,
            rating,
            amenities,
            excluded,
            top,
        } => {
            // flags override what the text implies
            let mut preferences = parse_preferences(&query);
            preferences.distance_km = distance.or(preferences.distance_km);
            preferences.monthly_budget = budget.or(preferences.monthly_budget);
            preferences.rating = rating.or(preferences.rating);
            for amenity in amenities {
                preferences = preferences.with_amenity(amenity);
            }
            for amenity in excluded {
                preferences = preferences.without_amenity(amenity);
            }
            debug!("Recommending with {:?}", preferences);

            for (i, recommendation) in recommend(&catalog, &preferences, top).iter().enumerate() {
                print_recommendation(i + 1, recommendation);
            }
        }
        Command::Show { id } => {
            let listing = find_listing(&catalog, id)?;
            let favorite = manager.is_favorite(id)?;
            println!("{} {}", listing.name, if favorite { "❤️" } else { "🤍" });
            println!("📍 {}", listing.location_label);
            println!(
                "{} per month  ⭐ {}",
                format_rupees(u64::from(listing.monthly_price)),
                listing.rating
            );
            println!();
            println!("Amenities:");
            for amenity in &listing.amenities {
                println!("  {} {}", amenity_icon(amenity), amenity);
            }
            println!();
            println!("{}", listing.description);
            println!();
            println!("{}", contact_line(listing));
        }
        Command::Quote {
            id,
            check_in,
            check_out,
        } => {
            let listing = find_listing(&catalog, id)?;
            match compute_booking(check_in, check_out, listing.monthly_price) {
                Ok(quote) => {
                    println!("Duration:     {}", duration_summary(&quote));
                    println!(
                        "Monthly Rate: {}",
                        format_rupees(u64::from(listing.monthly_price))
                    );
                    println!("Total Amount: {}", format_rupees(quote.total_amount));
                }
                Err(err) => {
                    println!("Invalid dates: {err}");
                }
            }
        }
        Command::Book {
            id,
            check_in,
            check_out,
            room,
            requests,
        } => {
            let listing = find_listing(&catalog, id)?;
            let request =
                BookingRequest::new(check_in, check_out, room).with_special_requests(requests);
            let booking = manager.create_booking(listing, request)?;
            println!(
                "Booking Confirmed! Total: {}. Booking ID: #{}",
                format_rupees(booking.total_amount),
                booking.id
            );
        }
        Command::Cancel { booking_id, yes } => {
            if !yes && !confirm("Are you sure you want to cancel this booking?")? {
                println!("Kept booking #{booking_id}");
                return Ok(());
            }
            manager.cancel_booking(booking_id)?;
            println!("Booking Cancelled: #{booking_id} has been cancelled successfully.");
        }
        Command::Bookings => {
            let bookings = manager.list_bookings()?;
            if bookings.is_empty() {
                println!("No Bookings Yet");
            }
            for booking in &bookings {
                print_booking(booking);
            }
        }
        Command::Favorite { id } => {
            let listing = find_listing(&catalog, id)?;
            let toggle = manager.toggle_favorite(id)?;
            if toggle.added {
                println!("Added to favorites! {}", listing.name);
            } else {
                println!("Removed from favorites: {}", listing.name);
            }
        }
        Command::Unfavorite { id } => {
            if manager.remove_favorite(id)? {
                println!("Removed listing {id} from favorites");
            } else {
                println!("Listing {id} was not a favorite");
            }
        }
        Command::Favorites => {
            let favorites = manager.list_favorite_listings(&catalog)?;
            if favorites.is_empty() {
                println!("No Favorites Yet");
            }
            for (i, listing) in favorites.iter().enumerate() {
                print_card(i + 1, listing);
            }
        }
        Command::ExportCatalog { path } => {
            let json = serde_json::to_string_pretty(catalog.listings())?;
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("💾 Saved {} listings to {}", catalog.len(), path.display());
        }
    }

    Ok(())
}

fn find_listing(catalog: &Catalog, id: ListingId) -> Result<&Listing> {
    match catalog.get(id) {
        Some(listing) => Ok(listing),
        None => bail!("Hostel {} not found", id),
    }
}

fn print_card(position: usize, listing: &Listing) {
    println!("{}. {} (#{})", position, listing.name, listing.id);
    println!("   📍 {}", listing.location_label);
    println!(
        "   {}/mo  ⭐ {}",
        format_rupees(u64::from(listing.monthly_price)),
        listing.rating
    );
    println!("   {}", listing.amenities.join(", "));
    println!();
}

fn print_recommendation(position: usize, recommendation: &Recommendation<'_>) {
    let listing = recommendation.listing;
    println!(
        "{}. {} (#{})  {:.0}% match",
        position,
        listing.name,
        listing.id,
        recommendation.match_score * 100.0
    );
    println!(
        "   📍 {}  {}/mo  ⭐ {}",
        listing.location_label,
        format_rupees(u64::from(listing.monthly_price)),
        listing.rating
    );
    for reason in &recommendation.explanation.top_matches {
        println!("   ✓ {}", reason.feature);
    }
    for shortfall in &recommendation.explanation.shortfalls {
        println!("   ✗ {}", shortfall.feature);
    }
    println!();
}

fn print_booking(booking: &Booking) {
    println!("{}  Booking ID: #{}", booking.listing_name, booking.id);
    println!("   Check-in:  {}", format_date(booking.check_in));
    println!("   Check-out: {}", format_date(booking.check_out));
    println!("   Room Type: {}", booking.room_type.label());
    println!("   Status:    {}", booking.status);
    if let Some(requests) = &booking.special_requests {
        println!("   Special Requests: {requests}");
    }
    println!("   Total Amount: {}", format_rupees(booking.total_amount));
    if booking.status == BookingStatus::Pending {
        println!("   (cancel with: havenly cancel {})", booking.id);
    }
    println!();
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
