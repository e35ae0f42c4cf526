use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::{AppState, Limiters};

use super::SharedCache;

/// 一轮清理的结果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub cache_entries: usize,
    pub rate_limit_records: usize,
}

/// 清理过期缓存条目和已结束的限流窗口
pub fn sweep_once(cache: &SharedCache<Value>, limiters: &Limiters) -> SweepReport {
    let cache_entries = cache.purge_expired();
    let rate_limit_records = limiters
        .all()
        .iter()
        .map(|limiter| limiter.purge_expired())
        .sum();

    SweepReport {
        cache_entries,
        rate_limit_records,
    }
}

/// 启动后台定时清理任务
pub fn spawn_sweeper(state: AppState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // 第一次 tick 立即返回，跳过
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let report = sweep_once(&state.cache, &state.limiters);
            if report.cache_entries > 0 || report.rate_limit_records > 0 {
                tracing::debug!(
                    "Sweeper purged {} cache entries and {} rate limit records",
                    report.cache_entries,
                    report.rate_limit_records
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use serde_json::json;
    use std::sync::Arc;

    fn test_state() -> (AppState, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let config = Config {
            cache_default_ttl_secs: 10,
            comment_rate_limit_window_secs: 5,
            activity_rate_limit_window_secs: 30,
            rate_limit_window_secs: 60,
            ..Config::default()
        };
        (AppState::with_clock(config, clock.clone()), clock)
    }

    #[test]
    fn test_sweep_once() {
        let (state, clock) = test_state();
        state.cache.set("short", json!(1), None);
        state
            .cache
            .set("long", json!(2), Some(Duration::from_secs(120)));
        state.limiters.comment.can_make_request("user-1");
        state.limiters.activity.can_make_request("user-1");
        state.limiters.client_ip.can_make_request("ip:127.0.0.1");

        clock.advance(20_000);
        let report = sweep_once(&state.cache, &state.limiters);
        assert_eq!(
            report,
            SweepReport {
                cache_entries: 1,
                rate_limit_records: 1,
            }
        );
        assert_eq!(state.cache.len(), 1);
        assert!(state.limiters.comment.is_empty());
        assert_eq!(state.limiters.activity.len(), 1);

        // 再扫一次什么都不剩下可清理
        assert_eq!(
            sweep_once(&state.cache, &state.limiters),
            SweepReport::default()
        );
    }

    #[tokio::test]
    async fn test_spawned_sweeper_purges_in_background() {
        let (state, clock) = test_state();
        state.cache.set("stale", json!("x"), None);
        clock.advance(11_000);

        let handle = spawn_sweeper(state.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert!(state.cache.is_empty());
    }
}
