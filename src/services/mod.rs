pub mod cache;
pub mod context;
pub mod messages;

pub use cache::{CacheStore, JsonFileCache, MemoryCache};
pub use context::BrowserContext;
pub use messages::{Level, Message, MessageLog};
