//! RBAC 管理后台主入口

use rbac_admin::{
    config::AppConfig, db, error::AppError, middleware::AppState, routes, services::RbacService,
    telemetry,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();
    let mut seed_only = false;

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("rbac-admin {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            "--seed" => seed_only = true,
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 1. 加载 .env 与配置
    if let Ok(env) = std::env::var("RBAC_ENV") {
        dotenv::from_filename(format!(".env.{}", env)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();
    }

    let config = AppConfig::from_env().map_err(|e| {
        let err = AppError::from(e);
        eprintln!("{}", err);
        err
    })?;

    // 2. 日志
    telemetry::init_telemetry(&config);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "RBAC admin starting...");

    // 3. 存储后端
    let (db_pool, rbac_service) = if config.storage.is_memory() {
        tracing::warn!("Using in-memory storage, all data is lost on restart");
        (None, RbacService::in_memory())
    } else {
        let pool = db::connect(&config.database).await?;
        tracing::info!("Database initialized");
        (Some(pool.clone()), RbacService::postgres(pool))
    };
    let rbac_service = Arc::new(rbac_service);

    // 4. 权限种子（失败可安全重跑）
    if seed_only || config.seed.on_startup {
        let summary = rbac_service.seed_default_permissions().await?;
        tracing::info!(seeded = summary.seeded, "Permission catalog reconciled");
    }
    if seed_only {
        return Ok(());
    }

    // 5. 构建路由
    let app_state = Arc::new(AppState::new(db_pool, rbac_service));
    let app = routes::create_router(app_state);

    // 6. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    // 7. 优雅关闭
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }
}

/// 打印帮助信息
fn print_help() {
    println!("rbac-admin {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: rbac-admin [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!("  --seed        写入内置权限目录后退出");
    println!();
    println!("环境变量:");
    println!("  所有配置通过 RBAC_ 前缀的环境变量完成");
    println!("  例如 RBAC_DATABASE__URL, RBAC_STORAGE__BACKEND=memory");
}
