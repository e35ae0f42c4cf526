use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::utils::{error_codes, error_to_api_response};

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    /// 超出限流，附带距离窗口重置的秒数
    RateLimited { retry_after_secs: i64 },
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, i32) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND),
            AppError::RateLimited { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, error_codes::RATE_LIMIT)
            }
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
            ),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "参数错误: {}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::RateLimited { retry_after_secs } => {
                write!(f, "请求过于频繁，请在{}秒后重试", retry_after_secs)
            }
            AppError::Internal(msg) => write!(f, "内部服务器错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

// 请求体不合法（缺少 content-type、JSON 格式错误、字段类型不符）统一按参数错误返回
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = error_to_api_response::<()>(code, self.to_string());
        (status, body).into_response()
    }
}
