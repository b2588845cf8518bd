//! 角色管理的 HTTP 处理器

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppError, middleware::AppState, models::role::*};

/// 列出角色（搜索、排序、分页）
pub async fn list_roles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RoleListParams>,
) -> Result<impl IntoResponse, AppError> {
    let result = state.rbac_service.list_roles(params).await?;

    let mut body = json!({
        "roles": result.items,
        "count": result.items.len(),
    });
    if let Some(pagination) = result.pagination {
        body["pagination"] = json!(pagination);
    }

    Ok(Json(body))
}

/// 创建角色
pub async fn create_role(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let role = state
        .rbac_service
        .create_role(&req.name, req.permissions)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Role created",
            "role": role
        })),
    ))
}

/// 获取角色详情（权限已展开）
pub async fn get_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let role = state.rbac_service.get_role(id).await?;

    Ok(Json(json!({ "role": role })))
}

/// 更新角色
pub async fn update_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let role = state
        .rbac_service
        .update_role(id, &req.name, req.permissions)
        .await?;

    Ok(Json(json!({
        "message": "Role updated",
        "role": role
    })))
}

/// 删除角色（软删除）
pub async fn delete_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.rbac_service.delete_role(id).await?;

    Ok(Json(json!({ "message": "Role deleted" })))
}
