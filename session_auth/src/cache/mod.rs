mod ttl_cache;
mod types;

pub use ttl_cache::TtlCache;
pub use types::CacheLoader;
