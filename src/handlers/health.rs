//! 健康检查处理器
//! 提供 /health 和 /ready 端点

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{db, middleware::AppState};

/// 存活探针响应
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// 就绪探针响应
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: Vec<HealthCheck>,
}

/// 健康检查项
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 存活探针
/// 快速响应，不检查依赖
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// 就绪探针
/// postgres 后端检查数据库连接；内存后端始终就绪
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> Json<ReadinessResponse> {
    let check = match &state.db {
        Some(pool) => {
            let status = db::health_check(pool).await;
            HealthCheck {
                name: "database".to_string(),
                status: if status.is_healthy() { "healthy" } else { "unhealthy" }.to_string(),
                message: match status {
                    db::HealthStatus::Unhealthy(msg) => Some(msg),
                    db::HealthStatus::Healthy => None,
                },
            }
        }
        None => HealthCheck {
            name: "storage".to_string(),
            status: "healthy".to_string(),
            message: Some(format!("{} backend", state.rbac_service.backend_name())),
        },
    };

    let checks = vec![check];
    let ready = checks.iter().all(|c| c.status == "healthy");

    Json(ReadinessResponse { ready, checks })
}
