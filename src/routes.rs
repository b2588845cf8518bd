//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, middleware::AppState};

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // RBAC 管理
    let rbac_routes = Router::new()
        .route("/api/v1/permissions", get(handlers::permission::list_permissions))
        .route("/api/v1/permissions/seed", post(handlers::permission::seed_permissions))
        .route(
            "/api/v1/roles",
            get(handlers::role::list_roles).post(handlers::role::create_role),
        )
        .route(
            "/api/v1/roles/{id}",
            get(handlers::role::get_role)
                .put(handlers::role::update_role)
                .delete(handlers::role::delete_role),
        );

    Router::new()
        .merge(public_routes)
        .merge(rbac_routes)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}
