//! Role repository (角色数据访问)

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{like_pattern, map_unique_violation, RoleStore};
use crate::{error::AppError, models::role::*};

pub struct RoleRepository {
    db: PgPool,
}

impl RoleRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleStore for RoleRepository {
    /// 根据名称查找角色（大小写不敏感）
    async fn find_by_name_ci(
        &self,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT * FROM roles
            WHERE is_delete = 0
              AND lower(btrim(name)) = lower(btrim($1))
              AND ($2::uuid IS NULL OR id <> $2)
            LIMIT 1
            "#,
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(role)
    }

    /// 创建角色
    async fn insert(&self, role: NewRole) -> Result<Role, AppError> {
        sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (id, name, permissions)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&role.name)
        .bind(&role.permissions)
        .fetch_one(&self.db)
        .await
        .map_err(map_unique_violation)
    }

    /// 根据 ID 查找角色
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1 AND is_delete = 0")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(role)
    }

    /// 列出角色（搜索、排序、分页）
    async fn list(&self, query: &RoleQuery) -> Result<(Vec<Role>, i64), AppError> {
        let mut where_clause = String::from(" WHERE is_delete = 0");
        let search_pattern = query.search.as_deref().map(like_pattern);
        if search_pattern.is_some() {
            where_clause.push_str(" AND name ILIKE $1 ESCAPE '\\'");
        }

        let mut sql = format!("SELECT * FROM roles{} ORDER BY {}", where_clause, order_clause(query.sort));

        let index = if search_pattern.is_some() { 1 } else { 0 };
        if query.page.is_some() {
            sql.push_str(&format!(" LIMIT ${} OFFSET ${}", index + 1, index + 2));
        }

        let mut query_builder = sqlx::query_as::<_, Role>(&sql);
        if let Some(pattern) = &search_pattern {
            query_builder = query_builder.bind(pattern);
        }
        if let Some(window) = &query.page {
            query_builder = query_builder.bind(window.limit).bind(window.offset());
        }

        let roles = query_builder.fetch_all(&self.db).await?;

        let total = match &query.page {
            Some(_) => {
                let count_sql = format!("SELECT COUNT(*) FROM roles{}", where_clause);
                let mut count_query = sqlx::query(&count_sql);
                if let Some(pattern) = &search_pattern {
                    count_query = count_query.bind(pattern);
                }
                count_query.fetch_one(&self.db).await?.get::<i64, _>(0)
            }
            None => roles.len() as i64,
        };

        Ok((roles, total))
    }

    /// 更新角色
    async fn update(&self, id: Uuid, changes: RoleChanges) -> Result<Option<Role>, AppError> {
        sqlx::query_as::<_, Role>(
            r#"
            UPDATE roles
            SET
                name = COALESCE($2, name),
                permissions = COALESCE($3, permissions),
                updated_at = NOW()
            WHERE id = $1 AND is_delete = 0
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.permissions)
        .fetch_optional(&self.db)
        .await
        .map_err(map_unique_violation)
    }

    /// 软删除角色
    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE roles
            SET is_delete = 1, deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND is_delete = 0
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// ORDER BY 子句；名称先按小写比较，id 作为最后的稳定排序键
fn order_clause(sort: RoleSort) -> String {
    let direction = sort.order.as_sql();
    match sort.field {
        RoleSortField::Id => format!("id {}", direction),
        RoleSortField::Name => format!(
            "lower(name) {0}, name {0}, id {0}",
            direction
        ),
        field => format!("{} {1}, id {1}", field.column(), direction),
    }
}
