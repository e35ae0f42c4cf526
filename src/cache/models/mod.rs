/// 缓存数据模型
pub mod item;
pub mod rate_limit;

pub use item::CacheItem;
pub use rate_limit::{RateLimitDecision, RequestRecord};
