use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::models::CacheItem;
use crate::clock::{Clock, system_clock};

/// 默认缓存时长，5 分钟
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// 带过期时间的键值缓存
///
/// 过期条目只在读取时惰性删除（或由 [`TtlCache::purge_expired`] 批量清理），
/// 没有容量上限，也没有 LRU 淘汰。
pub struct TtlCache<V> {
    entries: HashMap<String, CacheItem<V>>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V> TtlCache<V> {
    pub fn new() -> Self {
        Self::with_default_ttl(DEFAULT_TTL)
    }

    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, system_clock())
    }

    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
            clock,
        }
    }

    /// 写入缓存，`ttl` 为空时使用实例默认值
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let item = CacheItem::new(value, self.clock.now_ms(), ttl);
        self.entries.insert(key.into(), item);
    }

    /// 读取未过期的值，过期条目顺便删除
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let now = self.clock.now_ms();
        let expired = self.entries.get(key)?.is_expired(now);

        if expired {
            self.entries.remove(key);
            tracing::trace!("Evicted expired cache entry: {}", key);
            return None;
        }

        self.entries.get(key).map(|item| &item.data)
    }

    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 无条件删除，返回删除前是否存在该条目
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 当前保存的条目数，包括尚未被读取清理的过期条目
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// 清理所有过期条目，返回清理数量
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, item| !item.is_expired(now));
        before - self.entries.len()
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn cache_with_clock(ttl_ms: u64) -> (TtlCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let cache = TtlCache::with_clock(Duration::from_millis(ttl_ms), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_get_after_set() {
        let (mut cache, _clock) = cache_with_clock(1_000);
        cache.set("profile:alice", "Alice".to_string(), None);

        assert_eq!(cache.get("profile:alice"), Some(&"Alice".to_string()));
        assert!(cache.has("profile:alice"));
        assert_eq!(cache.get("profile:bob"), None);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let (mut cache, clock) = cache_with_clock(1_000);
        cache.set("k", "v".to_string(), None);

        // 恰好到达 ttl 时仍然可读
        clock.advance(1_000);
        assert!(cache.has("k"));

        clock.advance(1);
        assert_eq!(cache.get("k"), None);
        assert!(!cache.has("k"));
    }

    #[test]
    fn test_expired_entry_removed_on_read() {
        let (mut cache, clock) = cache_with_clock(100);
        cache.set("a", "1".to_string(), None);
        cache.set("b", "2".to_string(), None);

        clock.advance(101);
        // 过期但还没被读，仍占用空间
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_per_call_ttl_overrides_default() {
        let (mut cache, clock) = cache_with_clock(100);
        cache.set("short", "s".to_string(), None);
        cache.set("long", "l".to_string(), Some(Duration::from_secs(10)));

        clock.advance(5_000);
        assert!(!cache.has("short"));
        assert!(cache.has("long"));
    }

    #[test]
    fn test_set_replaces_and_restarts_ttl() {
        let (mut cache, clock) = cache_with_clock(1_000);
        cache.set("k", "old".to_string(), None);
        clock.advance(800);
        cache.set("k", "new".to_string(), None);
        clock.advance(800);

        assert_eq!(cache.get("k").map(String::as_str), Some("new"));
    }

    #[test]
    fn test_delete_and_clear() {
        let (mut cache, _clock) = cache_with_clock(1_000);
        cache.set("a", "1".to_string(), None);
        cache.set("b", "2".to_string(), None);
        cache.set("c", "3".to_string(), None);

        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));
        assert!(!cache.has("a"));

        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert!(!cache.has("b"));
        assert!(!cache.has("c"));
    }

    #[test]
    fn test_purge_expired_keeps_live_entries() {
        let (mut cache, clock) = cache_with_clock(100);
        cache.set("stale-1", "x".to_string(), None);
        cache.set("stale-2", "y".to_string(), None);
        cache.set("live", "z".to_string(), Some(Duration::from_secs(60)));

        clock.advance(200);
        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.has("live"));
    }

    #[test]
    fn test_default_ttl_is_five_minutes() {
        let cache: TtlCache<u32> = TtlCache::new();
        assert_eq!(cache.default_ttl(), Duration::from_secs(300));
    }
}
