//! 错误处理单元测试
//!
//! 测试核心错误到 HTTP 响应的映射

use axum::{http::StatusCode, response::IntoResponse};
use http_body_util::BodyExt;
use rbac_admin::{
    error::AppError,
    handlers::error::{status_code, ErrorResponse},
};
use validator::Validate;

// ==================== 错误状态码测试 ====================

#[test]
fn test_error_status_codes() {
    assert_eq!(status_code(&AppError::validation("bad")), StatusCode::BAD_REQUEST);
    assert_eq!(status_code(&AppError::not_found("role")), StatusCode::NOT_FOUND);
    assert_eq!(status_code(&AppError::conflict("dup")), StatusCode::CONFLICT);
}

#[test]
fn test_storage_error_status_code() {
    let app_error = AppError::Storage(sqlx::Error::RowNotFound);
    assert_eq!(status_code(&app_error), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_internal_and_config_error_status_code() {
    assert_eq!(
        status_code(&AppError::internal_error("boom")),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        status_code(&AppError::Config("missing".to_string())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

// ==================== 错误转换测试 ====================

#[test]
fn test_from_config_error() {
    let error: AppError = config::ConfigError::Message("bad value".to_string()).into();
    assert!(matches!(error, AppError::Config(_)));
}

#[test]
fn test_from_validation_errors() {
    let req = rbac_admin::models::role::CreateRoleRequest {
        name: String::new(),
        permissions: vec![],
    };
    let error: AppError = req.validate().unwrap_err().into();
    assert!(matches!(error, AppError::Validation(_)));
}

// ==================== 响应体测试 ====================

#[test]
fn test_error_response_hides_storage_details() {
    let response = ErrorResponse::from_error(&AppError::Storage(sqlx::Error::PoolTimedOut));
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["error"]["code"], 500);
    assert_eq!(json["error"]["message"], "Database error occurred");
    assert!(json["error"]["request_id"].is_string());
}

#[tokio::test]
async fn test_into_response_body() {
    let response = AppError::conflict("duplicate role name").into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"]["code"], 409);
    assert_eq!(json["error"]["message"], "duplicate role name");
}
