// 缓存模块
// 包含过期缓存、固定窗口限流和后台清理

pub mod keys;
pub mod models;
pub mod operations;
pub mod sweeper;

// 重新导出常用类型，方便其他模块使用
pub use models::{CacheItem, RateLimitDecision, RequestRecord};
pub use operations::{DEFAULT_TTL, RateLimiter, SharedCache, SharedRateLimiter, TtlCache};
