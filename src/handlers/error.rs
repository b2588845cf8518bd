//! 错误响应格式
//! 核心层错误到 HTTP 状态码与 JSON 响应体的转换

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::{error::AppError, middleware::current_request_id};

/// 获取 HTTP 状态码
pub fn status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Storage(_) | AppError::Config(_) | AppError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// 错误响应 DTO
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
    pub request_id: String,
}

impl ErrorResponse {
    pub fn from_error(error: &AppError) -> Self {
        Self {
            error: ErrorDetail {
                code: status_code(error).as_u16(),
                message: error.user_message(),
                request_id: current_request_id()
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        let body = ErrorResponse::from_error(&self);

        if status.is_server_error() {
            tracing::error!(
                code = body.error.code,
                message = %self,
                request_id = %body.error.request_id,
                "Application error"
            );
        } else {
            tracing::warn!(
                code = body.error.code,
                message = %self,
                request_id = %body.error.request_id,
                "Request rejected"
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(status_code(&AppError::validation("x")).as_u16(), 400);
        assert_eq!(status_code(&AppError::not_found("x")).as_u16(), 404);
        assert_eq!(status_code(&AppError::conflict("x")).as_u16(), 409);
        assert_eq!(status_code(&AppError::Storage(sqlx::Error::RowNotFound)).as_u16(), 500);
        assert_eq!(status_code(&AppError::Config("x".to_string())).as_u16(), 500);
    }

    #[test]
    fn test_error_response_hides_storage_details() {
        let body = ErrorResponse::from_error(&AppError::Storage(sqlx::Error::PoolTimedOut));
        assert_eq!(body.error.code, 500);
        assert_eq!(body.error.message, "Database error occurred");
        assert!(!body.error.request_id.is_empty());
    }
}
