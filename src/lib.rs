use std::str::FromStr;
use std::sync::Arc;

use cache::{SharedCache, SharedRateLimiter};
use clock::Clock;
use config::Config;
use serde_json::Value;

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod utils;

/// 按业务划分的限流器
#[derive(Clone)]
pub struct Limiters {
    /// 评论写入
    pub comment: SharedRateLimiter,
    /// 活动事件写入
    pub activity: SharedRateLimiter,
    /// 全局按客户端 IP 限流
    pub client_ip: SharedRateLimiter,
}

impl Limiters {
    pub fn for_scope(&self, scope: LimitScope) -> &SharedRateLimiter {
        match scope {
            LimitScope::Comment => &self.comment,
            LimitScope::Activity => &self.activity,
        }
    }

    pub fn all(&self) -> [&SharedRateLimiter; 3] {
        [&self.comment, &self.activity, &self.client_ip]
    }
}

/// 对外开放的限流范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitScope {
    Comment,
    Activity,
}

impl FromStr for LimitScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comment" => Ok(LimitScope::Comment),
            "activity" => Ok(LimitScope::Activity),
            other => Err(format!("未知的限流范围: {}", other)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub cache: SharedCache<Value>,
    pub limiters: Limiters,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, clock::system_clock())
    }

    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        let cache = SharedCache::with_clock(config.cache_default_ttl(), clock.clone());
        let limiters = Limiters {
            comment: SharedRateLimiter::with_clock(
                config.comment_rate_limit_requests,
                config.comment_rate_limit_window(),
                clock.clone(),
            ),
            activity: SharedRateLimiter::with_clock(
                config.activity_rate_limit_requests,
                config.activity_rate_limit_window(),
                clock.clone(),
            ),
            client_ip: SharedRateLimiter::with_clock(
                config.rate_limit_requests,
                config.rate_limit_window(),
                clock,
            ),
        };

        Self {
            config,
            cache,
            limiters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_parsing() {
        assert_eq!("comment".parse::<LimitScope>(), Ok(LimitScope::Comment));
        assert_eq!("activity".parse::<LimitScope>(), Ok(LimitScope::Activity));
        assert!("Comment".parse::<LimitScope>().is_err());
        assert!("posts".parse::<LimitScope>().is_err());
    }

    #[test]
    fn test_state_uses_configured_limits() {
        let state = AppState::new(Config::default());
        assert_eq!(state.limiters.comment.max_requests(), 5);
        assert_eq!(state.limiters.activity.max_requests(), 10);
        assert_eq!(state.limiters.client_ip.max_requests(), 100);
        assert_eq!(state.cache.default_ttl().as_secs(), 300);
    }
}
