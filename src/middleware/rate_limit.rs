use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    cache::{SharedRateLimiter, keys::client_ip_key},
    error::AppError,
};

/// 按客户端 IP 的全局限流
#[derive(Clone)]
pub struct IpRateLimiter {
    limiter: SharedRateLimiter,
}

// 优先 x-real-ip，其次 x-forwarded-for 第一个非空地址，最后是连接地址
pub(crate) fn client_ip(headers: &HeaderMap, remote_ip: Option<&str>) -> String {
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .filter(|ip| !ip.trim().is_empty())
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or(remote_ip)
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

impl IpRateLimiter {
    pub fn new(limiter: SharedRateLimiter) -> Self {
        Self { limiter }
    }

    pub async fn check_rate_limit(self: Arc<Self>, req: Request<Body>, next: Next) -> Response {
        // 从连接信息获取原始IP
        let remote_ip = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip().to_string());
        let ip = client_ip(req.headers(), remote_ip.as_deref());
        tracing::debug!("client ip: {}", ip);

        let decision = self.limiter.check(&client_ip_key(&ip));
        if !decision.allowed {
            let retry_after_secs = decision.retry_after_secs();
            tracing::warn!("Rate limit exceeded for {}, retry in {}s", ip, retry_after_secs);
            return AppError::RateLimited { retry_after_secs }.into_response();
        }

        next.run(req).await
    }
}

pub async fn rate_limit(
    State(limiter): State<Arc<IpRateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    limiter.check_rate_limit(req, next).await
}
