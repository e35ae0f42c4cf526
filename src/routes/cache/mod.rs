mod handler;
mod model;

pub use handler::{cache_exists, cache_stats, clear_cache, delete_entry, get_entry, set_entry};
pub use model::{
    CacheEntry, CacheStats, ClearedResponse, DeletedResponse, ExistsResponse, SetEntryRequest,
    SetEntryResponse,
};
