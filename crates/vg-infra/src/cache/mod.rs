//! Local cache adapters.

mod file_cache;
mod memory_cache;

pub use file_cache::{FileLocalCache, DEFAULT_CACHE_FILE};
pub use memory_cache::InMemoryLocalCache;
