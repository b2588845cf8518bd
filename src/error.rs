//! 统一错误模型
//! 核心层只返回类型化错误，HTTP 状态码映射见 `handlers::error`

use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 必填字段缺失或格式错误（上游校验之后仍到达核心层）
    #[error("Validation error: {0}")]
    Validation(String),

    /// 角色名重复等唯一性冲突
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 目标不存在或已被软删除
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 底层存储故障
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    // 便捷方法
    pub fn not_found(msg: &str) -> Self {
        AppError::NotFound(msg.to_string())
    }

    pub fn validation(msg: &str) -> Self {
        AppError::Validation(msg.to_string())
    }

    pub fn conflict(msg: &str) -> Self {
        AppError::Conflict(msg.to_string())
    }

    pub fn internal_error(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::NotFound(msg) => format!("Resource not found: {}", msg),
            AppError::Storage(_) => "Database error occurred".to_string(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// 是否为唯一索引冲突（存储层保证的最终约束）
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Storage(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_no_sensitive_info() {
        let error = AppError::Storage(sqlx::Error::RowNotFound);
        let message = error.user_message();
        assert_eq!(message, "Database error occurred");
        assert!(!message.contains("sqlx"));
    }

    #[test]
    fn test_conflict_message_passthrough() {
        let error = AppError::conflict("duplicate role name");
        assert_eq!(error.user_message(), "duplicate role name");
        assert_eq!(error.to_string(), "Conflict: duplicate role name");
    }

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        assert!(!AppError::Storage(sqlx::Error::RowNotFound).is_unique_violation());
        assert!(!AppError::conflict("x").is_unique_violation());
    }
}
