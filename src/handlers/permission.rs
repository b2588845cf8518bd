//! 权限目录的 HTTP 处理器

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::{error::AppError, middleware::AppState};

/// 列出所有权限
pub async fn list_permissions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let permissions = state.rbac_service.list_permissions().await?;

    Ok(Json(json!({
        "permissions": permissions,
        "count": permissions.len()
    })))
}

/// 写入内置权限目录（可重复执行）
pub async fn seed_permissions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state.rbac_service.seed_default_permissions().await?;

    Ok(Json(json!({
        "message": "Permissions seeded",
        "seeded": summary.seeded
    })))
}
