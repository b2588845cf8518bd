//! Shared list helpers: pagination window, metadata and sort direction

use serde::Serialize;

use crate::error::AppError;

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// 解析排序方向，接受 asc/ascending/1 与 desc/descending/-1
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(SortOrder::Asc),
            "desc" | "descending" | "-1" => Ok(SortOrder::Desc),
            other => Err(AppError::Validation(format!("Invalid sort order: {}", other))),
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// 分页窗口（page 从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Result<Self, AppError> {
        if page < 1 {
            return Err(AppError::validation("page must be >= 1"));
        }
        if limit < 1 {
            return Err(AppError::validation("limit must be >= 1"));
        }
        Ok(Self { page, limit })
    }

    /// 仅当 page 与 limit 同时提供时才分页
    pub fn from_parts(page: Option<i64>, limit: Option<i64>) -> Result<Option<Self>, AppError> {
        match (page, limit) {
            (Some(page), Some(limit)) => Self::new(page, limit).map(Some),
            _ => Ok(None),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// 分页元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, window: PageRequest) -> Self {
        let total_pages = if total <= 0 {
            0
        } else {
            (total - 1) / window.limit + 1
        };

        Self {
            total,
            page: window.page,
            limit: window.limit,
            total_pages,
        }
    }
}

/// 列表结果；未分页时不携带 pagination 字段
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}
