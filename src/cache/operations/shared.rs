use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::cache::models::RateLimitDecision;
use crate::clock::Clock;

use super::rate_limit::RateLimiter;
use super::ttl::TtlCache;

// 锁中毒时取回内部数据继续使用
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 线程安全的缓存句柄，克隆后共享同一份数据
pub struct SharedCache<V> {
    inner: Arc<Mutex<TtlCache<V>>>,
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone> SharedCache<V> {
    pub fn new(cache: TtlCache<V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self::new(TtlCache::with_clock(default_ttl, clock))
    }

    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        lock(&self.inner).set(key, value, ttl);
    }

    pub fn get(&self, key: &str) -> Option<V> {
        lock(&self.inner).get(key).cloned()
    }

    pub fn has(&self, key: &str) -> bool {
        lock(&self.inner).has(key)
    }

    pub fn delete(&self, key: &str) -> bool {
        lock(&self.inner).delete(key)
    }

    /// 清空缓存，返回清空前的条目数
    pub fn clear(&self) -> usize {
        let mut cache = lock(&self.inner);
        let size = cache.len();
        cache.clear();
        size
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.inner).is_empty()
    }

    pub fn default_ttl(&self) -> Duration {
        lock(&self.inner).default_ttl()
    }

    pub fn purge_expired(&self) -> usize {
        lock(&self.inner).purge_expired()
    }
}

/// 线程安全的限流器句柄
#[derive(Clone)]
pub struct SharedRateLimiter {
    inner: Arc<Mutex<RateLimiter>>,
}

impl SharedRateLimiter {
    pub fn new(limiter: RateLimiter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(limiter)),
        }
    }

    pub fn with_clock(max_requests: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self::new(RateLimiter::with_clock(max_requests, window, clock))
    }

    pub fn can_make_request(&self, key: &str) -> bool {
        lock(&self.inner).can_make_request(key)
    }

    pub fn check(&self, key: &str) -> RateLimitDecision {
        lock(&self.inner).check(key)
    }

    pub fn get_remaining_requests(&self, key: &str) -> u32 {
        lock(&self.inner).get_remaining_requests(key)
    }

    pub fn get_reset_time(&self, key: &str) -> Option<i64> {
        lock(&self.inner).get_reset_time(key)
    }

    pub fn reset(&self, key: &str) {
        lock(&self.inner).reset(key);
    }

    pub fn clear(&self) {
        lock(&self.inner).clear();
    }

    pub fn purge_expired(&self) -> usize {
        lock(&self.inner).purge_expired()
    }

    pub fn max_requests(&self) -> u32 {
        lock(&self.inner).max_requests()
    }

    pub fn window(&self) -> Duration {
        lock(&self.inner).window()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.inner).is_empty()
    }
}
