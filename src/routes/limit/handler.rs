use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState, LimitScope,
    cache::keys::{MAX_KEY_LEN, is_valid_key},
    error::AppError,
    utils::{ApiResponse, millis_to_datetime, success_to_api_response},
};

use super::model::{LimitCheckResponse, LimitStatusResponse};

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

fn parse_path(scope: &str, key: &str) -> Result<LimitScope, AppError> {
    let scope = scope.parse::<LimitScope>().map_err(AppError::Validation)?;
    if !is_valid_key(key) {
        return Err(AppError::Validation(format!(
            "限流键长度必须在1到{}字节之间",
            MAX_KEY_LEN
        )));
    }
    Ok(scope)
}

// 判定一次写操作是否放行，放行时计数
pub async fn check_limit(
    State(state): State<AppState>,
    Path((scope, key)): Path<(String, String)>,
) -> ApiResult<LimitCheckResponse> {
    let scope = parse_path(&scope, &key)?;
    let limiter = state.limiters.for_scope(scope);
    let decision = limiter.check(&key);

    if !decision.allowed {
        let retry_after_secs = decision.retry_after_secs();
        tracing::info!("{:?} limit reached for {}", scope, key);
        return Err(AppError::RateLimited { retry_after_secs });
    }

    Ok(success_to_api_response(LimitCheckResponse {
        allowed: decision.allowed,
        remaining: decision.remaining,
        reset_time: decision.reset_time,
        reset_at: millis_to_datetime(decision.reset_time),
    }))
}

// 查询剩余次数，不计数
pub async fn limit_status(
    State(state): State<AppState>,
    Path((scope, key)): Path<(String, String)>,
) -> ApiResult<LimitStatusResponse> {
    let scope = parse_path(&scope, &key)?;
    let limiter = state.limiters.for_scope(scope);
    let reset_time = limiter.get_reset_time(&key);

    Ok(success_to_api_response(LimitStatusResponse {
        remaining: limiter.get_remaining_requests(&key),
        reset_time,
        reset_at: reset_time.and_then(millis_to_datetime),
        max_requests: limiter.max_requests(),
        window_ms: u64::try_from(limiter.window().as_millis()).unwrap_or(u64::MAX),
    }))
}
