/// Cache adapters - TTL memoization over a KeyValueStore
mod ttl_cache;

pub use ttl_cache::{CacheEntry, CacheLookup, TtlCache, DEFAULT_CACHE_PREFIX, DEFAULT_TTL_HOURS};
