/// 缓存操作
/// 提供缓存和限流的实现

// 过期缓存
pub mod ttl;

// 固定窗口限流
pub mod rate_limit;

// 线程安全句柄
pub mod shared;

// 重新导出常用操作
pub use rate_limit::RateLimiter;
pub use shared::{SharedCache, SharedRateLimiter};
pub use ttl::{DEFAULT_TTL, TtlCache};
