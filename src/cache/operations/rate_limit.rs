use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::models::{RateLimitDecision, RequestRecord};
use crate::clock::{Clock, system_clock};

/// 固定窗口限流器
///
/// 每个 key 独立计数；窗口结束后的第一次请求开启新窗口。
/// 窗口边界附近最多可能放行两倍的额定请求数。
pub struct RateLimiter {
    records: HashMap<String, RequestRecord>,
    max_requests: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::with_clock(max_requests, window, system_clock())
    }

    pub fn with_clock(max_requests: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: HashMap::new(),
            max_requests,
            window,
            clock,
        }
    }

    fn window_ms(&self) -> i64 {
        i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX)
    }

    /// 判定并计数，返回是否放行
    pub fn can_make_request(&mut self, key: &str) -> bool {
        self.check(key).allowed
    }

    /// 判定并计数，同时返回剩余次数和窗口结束时间
    pub fn check(&mut self, key: &str) -> RateLimitDecision {
        let now = self.clock.now_ms();
        let max_requests = self.max_requests;
        let window_ms = self.window_ms();

        match self.records.get_mut(key) {
            Some(record) if !record.is_elapsed(now) => {
                let allowed = record.count < max_requests;
                if allowed {
                    record.count += 1;
                }
                RateLimitDecision {
                    allowed,
                    remaining: max_requests.saturating_sub(record.count),
                    reset_time: record.reset_time,
                    checked_at: now,
                }
            }
            _ => {
                // 没有记录或窗口已结束，开启新窗口
                let record = RequestRecord {
                    count: 1,
                    reset_time: now.saturating_add(window_ms),
                };
                self.records.insert(key.to_string(), record);
                tracing::debug!("New rate limit window for {}", key);
                RateLimitDecision {
                    allowed: true,
                    remaining: max_requests.saturating_sub(1),
                    reset_time: record.reset_time,
                    checked_at: now,
                }
            }
        }
    }

    /// 当前窗口剩余次数，只读
    pub fn get_remaining_requests(&self, key: &str) -> u32 {
        let now = self.clock.now_ms();
        match self.records.get(key) {
            Some(record) if !record.is_elapsed(now) => {
                self.max_requests.saturating_sub(record.count)
            }
            _ => self.max_requests,
        }
    }

    /// 当前窗口结束时间，没有活动窗口时为 None
    pub fn get_reset_time(&self, key: &str) -> Option<i64> {
        let now = self.clock.now_ms();
        self.records
            .get(key)
            .filter(|record| !record.is_elapsed(now))
            .map(|record| record.reset_time)
    }

    pub fn reset(&mut self, key: &str) {
        self.records.remove(key);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// 删除窗口已结束的记录，返回删除数量
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_elapsed(now));
        before - self.records.len()
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
