use serde::{Deserialize, Serialize};
use serde_json::Value;

// 写入缓存请求
#[derive(Debug, Serialize, Deserialize)]
pub struct SetEntryRequest {
    pub value: Value,
    /// 为空时使用默认缓存时长
    pub ttl_ms: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetEntryResponse {
    pub key: String,
    pub ttl_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearedResponse {
    pub cleared: usize,
}

// 缓存统计
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub default_ttl_ms: u64,
}
