pub mod kv;
pub mod printer;
pub mod store;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use printer::list_stats;
pub use store::{StatEntry, StatsStore};
