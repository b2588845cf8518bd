//! Permission repository (权限目录数据访问)

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::PermissionStore;
use crate::{error::AppError, models::permission::*};

pub struct PermissionRepository {
    db: PgPool,
}

impl PermissionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PermissionStore for PermissionRepository {
    /// 按 key upsert 权限定义
    async fn upsert(&self, def: &PermissionDef) -> Result<Permission, AppError> {
        let permission = sqlx::query_as::<_, Permission>(
            r#"
            INSERT INTO permissions (id, key, group_name, permission_type, title, sort_order, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (key) DO UPDATE
            SET
                group_name = EXCLUDED.group_name,
                permission_type = EXCLUDED.permission_type,
                title = EXCLUDED.title,
                sort_order = EXCLUDED.sort_order,
                category = EXCLUDED.category,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&def.key)
        .bind(&def.group)
        .bind(&def.permission_type)
        .bind(&def.title)
        .bind(def.order)
        .bind(&def.category)
        .fetch_one(&self.db)
        .await?;

        Ok(permission)
    }

    /// 列出所有未删除的权限
    async fn list_active(&self) -> Result<Vec<Permission>, AppError> {
        let permissions = sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE is_delete = 0 ORDER BY sort_order, key",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(permissions)
    }

    async fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Permission>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let permissions = sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE is_delete = 0 AND id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.db)
        .await?;

        Ok(permissions)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
