//! PostgreSQL 后端的连接池、嵌入式迁移与就绪检查

use crate::config::DatabaseConfig;
use secrecy::ExposeSecret;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// 按配置构造连接池参数
pub fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
}

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    let pool = pool_options(config)
        .connect(config.url.expose_secret())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            DbError::ConnectionFailed(e.to_string())
        })?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "PostgreSQL pool ready"
    );
    Ok(pool)
}

/// 应用 migrations/ 下的表结构（permissions、roles 及角色名部分唯一索引）
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        tracing::error!(error = %e, "Migration failed");
        DbError::MigrationFailed(e.to_string())
    })?;

    tracing::info!("Schema up to date");
    Ok(())
}

/// 连接并迁移，postgres 后端启动时调用
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    let pool = create_pool(config).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// 就绪探针使用的数据库检查
pub async fn health_check(pool: &PgPool) -> HealthStatus {
    record_pool_metrics(pool);

    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => HealthStatus::Healthy,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            HealthStatus::Unhealthy(e.to_string())
        }
    }
}

pub fn record_pool_metrics(pool: &PgPool) {
    metrics::gauge!("db.pool.size").set(pool.size() as f64);
    metrics::gauge!("db.pool.idle").set(pool.num_idle() as f64);
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    #[test]
    fn test_pool_options_follow_config() {
        let config = DatabaseConfig {
            url: Secret::new("postgresql://localhost/rbac".to_string()),
            max_connections: 7,
            min_connections: 3,
            acquire_timeout_secs: 4,
            idle_timeout_secs: 60,
            max_lifetime_secs: 120,
        };

        let options = pool_options(&config);
        assert_eq!(options.get_max_connections(), 7);
        assert_eq!(options.get_min_connections(), 3);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(4));
    }

    #[test]
    fn test_health_status() {
        assert!(HealthStatus::Healthy.is_healthy());
        assert!(!HealthStatus::Unhealthy("Connection refused".to_string()).is_healthy());
    }

    #[test]
    fn test_db_error_display() {
        let err = DbError::MigrationFailed("checksum mismatch".to_string());
        assert_eq!(err.to_string(), "Migration failed: checksum mismatch");
    }
}
