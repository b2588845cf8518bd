//! Permission catalog models (权限目录)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 软删除状态，存储为 SMALLINT 0/1，序列化为数字
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(into = "u8", try_from = "u8")]
#[repr(i16)]
pub enum DeleteState {
    #[default]
    Active = 0,
    Deleted = 1,
}

impl DeleteState {
    pub fn is_active(self) -> bool {
        self == DeleteState::Active
    }
}

impl From<DeleteState> for u8 {
    fn from(state: DeleteState) -> Self {
        match state {
            DeleteState::Active => 0,
            DeleteState::Deleted => 1,
        }
    }
}

impl TryFrom<u8> for DeleteState {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DeleteState::Active),
            1 => Ok(DeleteState::Deleted),
            other => Err(format!("invalid delete state: {}", other)),
        }
    }
}

/// Permission record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Permission {
    pub id: Uuid,
    pub key: String,
    #[sqlx(rename = "group_name")]
    pub group: String,
    #[serde(rename = "type")]
    pub permission_type: String,
    pub title: String,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    pub category: String,
    pub is_delete: DeleteState,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Seed definition (upsert by `key`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDef {
    pub key: String,
    pub group: String,
    #[serde(rename = "type")]
    pub permission_type: String,
    pub title: String,
    pub order: i32,
    pub category: String,
}

impl PermissionDef {
    pub fn new(
        key: &str,
        group: &str,
        permission_type: &str,
        title: &str,
        order: i32,
        category: &str,
    ) -> Self {
        Self {
            key: key.to_string(),
            group: group.to_string(),
            permission_type: permission_type.to_string(),
            title: title.to_string(),
            order,
            category: category.to_string(),
        }
    }
}

/// Seed result
#[derive(Debug, Serialize)]
pub struct SeedSummary {
    pub seeded: usize,
}
