/// 缓存键模块
/// 提供限流键生成函数

// 客户端限流键
pub mod client_keys;

pub use client_keys::{MAX_KEY_LEN, client_ip_key, is_valid_key};
