pub mod cache;
pub mod http;
pub mod time;

pub use cache::{FileLocalCache, InMemoryLocalCache};
pub use http::HttpProgressClient;
pub use time::SystemClock;
