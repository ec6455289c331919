pub mod adapter;
pub mod file;
pub mod memory;
pub mod traits;

pub use adapter::{PersistentStore, BOOKINGS_KEY, FAVORITES_KEY};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;
