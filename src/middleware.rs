//! HTTP 中间件与共享状态
//! 请求追踪（trace_id / request_id）与请求指标

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::services::RbacService;

/// 应用状态
///
/// 服务使用 Arc 包装，多个请求共享同一实例；
/// `db` 仅在 postgres 后端下存在，用于就绪探针。
#[derive(Clone)]
pub struct AppState {
    pub db: Option<sqlx::PgPool>,
    pub rbac_service: Arc<RbacService>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: Option<sqlx::PgPool>, rbac_service: Arc<RbacService>) -> Self {
        Self {
            db,
            rbac_service,
            started_at: Instant::now(),
        }
    }
}

tokio::task_local! {
    /// 当前请求的 request_id，由追踪中间件在处理请求期间设置
    static REQUEST_ID: String;
}

/// 当前请求的 request_id；请求上下文之外返回 None
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let uri = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let scoped_id = request_id.clone();
    let tracked = async move {
        let start = Instant::now();
        let mut response = next.run(req).await;
        let elapsed = start.elapsed();

        let status = response.status().as_u16();
        metrics::counter!(
            "http_requests_total",
            "method" => method_label(&method),
            "status" => status_label(status)
        )
        .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            method = %method,
            uri = %uri,
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        // 在响应头中回显 trace_id / request_id
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span);

    REQUEST_ID.scope(scoped_id, tracked).await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "PATCH" => "PATCH",
        _ => "UNKNOWN",
    }
}

fn status_label(status: u16) -> &'static str {
    match status {
        200 => "200",
        201 => "201",
        204 => "204",
        400 => "400",
        404 => "404",
        409 => "409",
        500 => "500",
        _ => "other",
    }
}
