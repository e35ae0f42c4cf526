use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 限流判定响应
#[derive(Debug, Serialize, Deserialize)]
pub struct LimitCheckResponse {
    pub allowed: bool,
    pub remaining: u32,
    /// 窗口结束时间，Unix 毫秒
    pub reset_time: i64,
    pub reset_at: Option<DateTime<Utc>>,
}

// 限流状态查询响应
#[derive(Debug, Serialize, Deserialize)]
pub struct LimitStatusResponse {
    pub remaining: u32,
    /// 没有进行中的窗口时为空
    pub reset_time: Option<i64>,
    pub reset_at: Option<DateTime<Utc>>,
    pub max_requests: u32,
    pub window_ms: u64,
}
