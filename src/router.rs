use std::any::Any;
use std::sync::Arc;

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use crate::{
    AppState,
    error::AppError,
    middleware::{IpRateLimiter, log_errors, rate_limit},
    routes,
};

// 缓存相关的路由
fn cache_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cache",
            get(routes::cache::cache_stats).delete(routes::cache::clear_cache),
        )
        .route(
            "/cache/{key}",
            get(routes::cache::get_entry)
                .put(routes::cache::set_entry)
                .delete(routes::cache::delete_entry),
        )
        .route("/cache/{key}/exists", get(routes::cache::cache_exists))
}

// 限流相关的路由
fn limit_routes() -> Router<AppState> {
    Router::new().route(
        "/limits/{scope}/{key}",
        post(routes::limit::check_limit).get(routes::limit::limit_status),
    )
}

// handler 发生 panic 时返回统一的 500 响应
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    AppError::Internal(detail).into_response()
}

/// 挂载限流、错误日志和 panic 兜底中间件
pub fn with_middleware(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let ip_limiter = Arc::new(IpRateLimiter::new(state.limiters.client_ip.clone()));

    // 限流在最外层，被拒绝的请求不会进入日志中间件；panic 兜底在最内层，产生的 500 会被记录
    let router = router.layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(ip_limiter, rate_limit))
            .layer(axum::middleware::from_fn(log_errors))
            .layer(CatchPanicLayer::custom(panic_response)),
    );

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    router
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    let api = Router::new().merge(cache_routes()).merge(limit_routes());
    // axum 不允许挂载在根路径，此时直接合并
    let base = state.config.api_base_uri.trim_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(&format!("/{}", base), api)
    };

    with_middleware(router, &state).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn explode() -> &'static str {
        panic!("cache backend exploded")
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_internal_error() {
        let state = AppState::new(Config::default());
        let router = Router::new().route("/explode", get(explode));
        let app = with_middleware(router, &state).with_state(state);

        let resp = app
            .oneshot(Request::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], 5000);
        assert_eq!(body["msg"], "内部服务器错误: cache backend exploded");
    }
}
