//! 日志与追踪系统
//! 初始化结构化日志

use crate::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 初始化日志与追踪系统；RUST_LOG 优先于配置中的级别
pub fn init_telemetry(config: &AppConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let log_layer = match config.logging.format.to_lowercase().as_str() {
        // JSON 格式（生产环境）
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .boxed(),
        // 美化格式（开发环境）
        "pretty" => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer().with_target(false).boxed(),
    };

    // 重复初始化（例如测试中）时忽略错误
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(log_layer)
        .try_init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.logging.level,
        format = %config.logging.format,
        storage = %config.storage.backend,
        "Telemetry initialized"
    );
}
