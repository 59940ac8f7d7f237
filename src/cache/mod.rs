// Cache module for rate-limit friendly response caching.
// Stores GitHub API responses with a TTL over a pluggable key-value medium.

pub mod clock;
pub mod entry;
pub mod key;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, Probe};
pub use key::KeyScheme;
pub use store::{CacheStore, DEFAULT_TTL};
