pub mod calculator;
pub mod clock;
pub mod manager;

pub use calculator::{compute_booking, BookingQuote, DAYS_PER_MONTH};
pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::{BookingManager, FavoriteToggle};
