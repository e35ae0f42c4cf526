use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use crate::{
    AppState,
    cache::keys::{MAX_KEY_LEN, is_valid_key},
    error::AppError,
    utils::{ApiResponse, success_to_api_response},
};

use super::model::{
    CacheEntry, CacheStats, ClearedResponse, DeletedResponse, ExistsResponse, SetEntryRequest,
    SetEntryResponse,
};

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

fn validate_key(key: &str) -> Result<(), AppError> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "缓存键长度必须在1到{}字节之间",
            MAX_KEY_LEN
        )))
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// 缓存统计
pub async fn cache_stats(State(state): State<AppState>) -> ApiResult<CacheStats> {
    Ok(success_to_api_response(CacheStats {
        size: state.cache.len(),
        default_ttl_ms: duration_ms(state.cache.default_ttl()),
    }))
}

// 清空缓存
pub async fn clear_cache(State(state): State<AppState>) -> ApiResult<ClearedResponse> {
    let cleared = state.cache.clear();
    tracing::info!("Cache cleared, {} entries removed", cleared);
    Ok(success_to_api_response(ClearedResponse { cleared }))
}

// 写入缓存
pub async fn set_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
    payload: Result<Json<SetEntryRequest>, JsonRejection>,
) -> ApiResult<SetEntryResponse> {
    validate_key(&key)?;
    let Json(req) = payload?;

    let ttl = req.ttl_ms.map(Duration::from_millis);
    let ttl_ms = duration_ms(ttl.unwrap_or_else(|| state.cache.default_ttl()));
    state.cache.set(key.clone(), req.value, ttl);

    Ok(success_to_api_response(SetEntryResponse { key, ttl_ms }))
}

// 读取缓存
pub async fn get_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<CacheEntry> {
    validate_key(&key)?;

    match state.cache.get(&key) {
        Some(value) => Ok(success_to_api_response(CacheEntry { key, value })),
        None => Err(AppError::NotFound("缓存不存在或已过期".to_string())),
    }
}

pub async fn cache_exists(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<ExistsResponse> {
    validate_key(&key)?;
    Ok(success_to_api_response(ExistsResponse {
        exists: state.cache.has(&key),
    }))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<DeletedResponse> {
    validate_key(&key)?;
    Ok(success_to_api_response(DeletedResponse {
        deleted: state.cache.delete(&key),
    }))
}
