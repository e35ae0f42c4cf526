use std::time::Duration;

/// 缓存条目
#[derive(Debug, Clone)]
pub struct CacheItem<T> {
    pub data: T,
    /// 写入时间，Unix 毫秒
    pub timestamp: i64,
    /// 存活时长，毫秒
    pub ttl: i64,
}

impl<T> CacheItem<T> {
    pub fn new(data: T, timestamp: i64, ttl: Duration) -> Self {
        Self {
            data,
            timestamp,
            ttl: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
        }
    }

    /// 超过 ttl 才算过期，恰好等于 ttl 时仍然有效
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms.saturating_sub(self.timestamp) > self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_strictly_after_ttl() {
        let item = CacheItem::new("v", 1_000, Duration::from_millis(500));
        assert!(!item.is_expired(1_000));
        assert!(!item.is_expired(1_500));
        assert!(item.is_expired(1_501));
    }

    #[test]
    fn huge_ttl_does_not_overflow() {
        let item = CacheItem::new((), i64::MAX - 1, Duration::MAX);
        assert!(!item.is_expired(i64::MAX));
    }
}
