/// 单个 key 在当前固定窗口内的请求记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestRecord {
    pub count: u32,
    /// 窗口结束时间，Unix 毫秒
    pub reset_time: i64,
}

impl RequestRecord {
    pub fn is_elapsed(&self, now_ms: i64) -> bool {
        now_ms > self.reset_time
    }
}

/// 一次限流判定的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_time: i64,
    /// 判定时刻，Unix 毫秒
    pub checked_at: i64,
}

impl RateLimitDecision {
    /// 距离窗口重置还有多少秒，向上取整，至少 1 秒
    pub fn retry_after_secs(&self) -> i64 {
        let remaining_ms = self.reset_time.saturating_sub(self.checked_at).max(0);
        ((remaining_ms + 999) / 1000).max(1)
    }
}
