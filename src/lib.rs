// Planner - four task lists mirrored to a persistent key-value slot

pub mod config;
pub mod id;
pub mod kv;
pub mod models;
pub mod reducer;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use id::{Clock, IdGenerator, SequentialIds, SteppingClock, SystemClock, UuidIds};
pub use kv::{FileKv, KvStore, MemoryKv};
pub use models::{Category, Item, PlannerState, REVIEW_LABELS, now_ms};
pub use reducer::{Action, reduce, sorted_view};
pub use store::{DEFAULT_STORAGE_KEY, ListStore, load};
