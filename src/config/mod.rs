use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub cache_default_ttl_secs: u64,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
    pub comment_rate_limit_window_secs: u64,
    pub comment_rate_limit_requests: u32,
    pub activity_rate_limit_window_secs: u64,
    pub activity_rate_limit_requests: u32,
    pub sweep_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "::".to_string(),
            server_port: 3000,
            api_base_uri: "/api".to_string(),
            cache_default_ttl_secs: 300,
            rate_limit_window_secs: 60,
            rate_limit_requests: 100,
            comment_rate_limit_window_secs: 60,
            comment_rate_limit_requests: 5,
            activity_rate_limit_window_secs: 60,
            activity_rate_limit_requests: 10,
            sweep_interval_secs: 60,
        }
    }
}

// 缺失或无法解析时使用默认值，只有非 unicode 的值算错误
fn read_or<T, F>(lookup: &F, name: &str, default: T) -> Result<T, env::VarError>
where
    T: FromStr,
    F: Fn(&str) -> Result<String, env::VarError>,
{
    match lookup(name) {
        Ok(value) => Ok(value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}, falling back to default", name);
            default
        })),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let defaults = Config::default();
        Ok(Config {
            server_host: read_or(&lookup, "SERVER_HOST", defaults.server_host)?,
            server_port: read_or(&lookup, "SERVER_PORT", defaults.server_port)?,
            api_base_uri: read_or(&lookup, "API_BASE_URI", defaults.api_base_uri)?,
            cache_default_ttl_secs: read_or(
                &lookup,
                "CACHE_DEFAULT_TTL_SECS",
                defaults.cache_default_ttl_secs,
            )?,
            rate_limit_window_secs: read_or(
                &lookup,
                "RATE_LIMIT_WINDOW",
                defaults.rate_limit_window_secs,
            )?,
            rate_limit_requests: read_or(
                &lookup,
                "RATE_LIMIT_REQUESTS",
                defaults.rate_limit_requests,
            )?,
            comment_rate_limit_window_secs: read_or(
                &lookup,
                "COMMENT_RATE_LIMIT_WINDOW",
                defaults.comment_rate_limit_window_secs,
            )?,
            comment_rate_limit_requests: read_or(
                &lookup,
                "COMMENT_RATE_LIMIT_REQUESTS",
                defaults.comment_rate_limit_requests,
            )?,
            activity_rate_limit_window_secs: read_or(
                &lookup,
                "ACTIVITY_RATE_LIMIT_WINDOW",
                defaults.activity_rate_limit_window_secs,
            )?,
            activity_rate_limit_requests: read_or(
                &lookup,
                "ACTIVITY_RATE_LIMIT_REQUESTS",
                defaults.activity_rate_limit_requests,
            )?,
            sweep_interval_secs: read_or(
                &lookup,
                "SWEEP_INTERVAL_SECS",
                defaults.sweep_interval_secs,
            )?,
        })
    }

    pub fn cache_default_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_default_ttl_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn comment_rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.comment_rate_limit_window_secs)
    }

    pub fn activity_rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.activity_rate_limit_window_secs)
    }

    /// 为 0 时不启动后台清理
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Result<String, env::VarError> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned().ok_or(env::VarError::NotPresent)
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.api_base_uri, "/api");
        assert_eq!(config.cache_default_ttl(), Duration::from_secs(300));
        assert_eq!(config.rate_limit_requests, 100);
        assert_eq!(config.comment_rate_limit_requests, 5);
        assert_eq!(config.activity_rate_limit_requests, 10);
        assert_eq!(config.sweep_interval(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_PORT", "8080"),
            ("CACHE_DEFAULT_TTL_SECS", "30"),
            ("COMMENT_RATE_LIMIT_REQUESTS", " 3 "),
            ("RATE_LIMIT_REQUESTS", "lots"),
            ("SWEEP_INTERVAL_SECS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cache_default_ttl(), Duration::from_secs(30));
        assert_eq!(config.comment_rate_limit_requests, 3);
        assert_eq!(config.rate_limit_requests, 100);
        assert_eq!(config.sweep_interval(), None);
    }

    #[test]
    fn test_non_unicode_is_an_error() {
        let result = Config::from_lookup(|name| {
            if name == "SERVER_HOST" {
                Err(env::VarError::NotUnicode("\u{fffd}".into()))
            } else {
                Err(env::VarError::NotPresent)
            }
        });
        assert!(result.is_err());
    }
}
