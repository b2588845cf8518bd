//! RBAC 服务：权限种子、角色生命周期与跨存储的不变量

use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        pagination::{ListResult, Pagination},
        permission::{Permission, PermissionDef, SeedSummary},
        role::{NewRole, Role, RoleChanges, RoleListParams, RoleView},
    },
    repository::{
        name_key, InMemoryPermissionStore, InMemoryRoleStore, PermissionRepository,
        PermissionStore, RoleRepository, RoleStore, DUPLICATE_ROLE_NAME,
    },
};

use super::permission_defs::default_permission_defs;

pub struct RbacService {
    permissions: Arc<dyn PermissionStore>,
    roles: Arc<dyn RoleStore>,
}

impl RbacService {
    pub fn new(permissions: Arc<dyn PermissionStore>, roles: Arc<dyn RoleStore>) -> Self {
        Self { permissions, roles }
    }

    /// PostgreSQL 后端
    pub fn postgres(db: PgPool) -> Self {
        Self::new(
            Arc::new(PermissionRepository::new(db.clone())),
            Arc::new(RoleRepository::new(db)),
        )
    }

    /// 内存后端（测试与本地开发）
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryPermissionStore::new()),
            Arc::new(InMemoryRoleStore::new()),
        )
    }

    pub fn backend_name(&self) -> &'static str {
        self.roles.backend_name()
    }

    // ==================== Permissions ====================

    /// 按顺序 upsert 权限定义
    pub async fn seed_permissions(
        &self,
        definitions: &[PermissionDef],
    ) -> Result<SeedSummary, AppError> {
        let seeded = self.permissions.seed(definitions).await.map_err(|e| {
            tracing::error!(error = %e, "Permission seeding aborted");
            e
        })?;

        tracing::info!(seeded, backend = self.permissions.backend_name(), "Permissions seeded");
        Ok(SeedSummary { seeded })
    }

    /// 写入内置权限目录
    pub async fn seed_default_permissions(&self) -> Result<SeedSummary, AppError> {
        self.seed_permissions(&default_permission_defs()).await
    }

    /// 列出所有未删除的权限
    pub async fn list_permissions(&self) -> Result<Vec<Permission>, AppError> {
        self.permissions.list_active().await
    }

    // ==================== Roles ====================

    /// 创建角色
    ///
    /// 权限 id 原样保存：不去重，也不校验是否存在于权限目录。
    pub async fn create_role(
        &self,
        name: &str,
        permission_ids: Vec<Uuid>,
    ) -> Result<Role, AppError> {
        let name = required_name(name)?;

        if self.roles.find_by_name_ci(&name, None).await?.is_some() {
            return Err(AppError::conflict(DUPLICATE_ROLE_NAME));
        }

        let role = self
            .roles
            .insert(NewRole {
                name,
                permissions: permission_ids,
            })
            .await?;

        tracing::info!(role_id = %role.id, name = %role.name, "Role created");
        Ok(role)
    }

    /// 列出角色；仅当 page 与 limit 同时提供时附带分页元数据
    pub async fn list_roles(&self, params: RoleListParams) -> Result<ListResult<RoleView>, AppError> {
        let query = params.into_query()?;
        let (roles, total) = self.roles.list(&query).await?;
        let items = self.expand(roles).await?;

        Ok(ListResult {
            items,
            pagination: query.page.map(|window| Pagination::new(total, window)),
        })
    }

    /// 获取角色详情
    pub async fn get_role(&self, id: Uuid) -> Result<RoleView, AppError> {
        let role = self.load_role(id).await?;
        self.expand_one(role).await
    }

    /// 更新角色名称与权限
    pub async fn update_role(
        &self,
        id: Uuid,
        name: &str,
        permission_ids: Vec<Uuid>,
    ) -> Result<RoleView, AppError> {
        let current = self.load_role(id).await?;
        let name = required_name(name)?;

        if name_key(&name) != name_key(&current.name)
            && self.roles.find_by_name_ci(&name, Some(id)).await?.is_some()
        {
            return Err(AppError::conflict(DUPLICATE_ROLE_NAME));
        }

        let updated = self
            .roles
            .update(
                id,
                RoleChanges {
                    name: Some(name),
                    permissions: Some(permission_ids),
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))?;

        tracing::info!(role_id = %updated.id, name = %updated.name, "Role updated");
        self.expand_one(updated).await
    }

    /// 软删除角色
    pub async fn delete_role(&self, id: Uuid) -> Result<(), AppError> {
        let role = self.load_role(id).await?;

        if !self.roles.soft_delete(role.id).await? {
            return Err(AppError::not_found("Role not found"));
        }

        tracing::info!(role_id = %role.id, name = %role.name, "Role deleted");
        Ok(())
    }

    async fn load_role(&self, id: Uuid) -> Result<Role, AppError> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))
    }

    async fn expand_one(&self, role: Role) -> Result<RoleView, AppError> {
        let mut views = self.expand(vec![role]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::internal_error("role expansion returned no rows"))
    }

    /// 两步读取：先取角色，再一次性批量查找所有引用的权限
    async fn expand(&self, roles: Vec<Role>) -> Result<Vec<RoleView>, AppError> {
        let mut ids: Vec<Uuid> = roles.iter().flat_map(|r| r.permissions.iter().copied()).collect();
        ids.sort_unstable();
        ids.dedup();

        let lookup: HashMap<Uuid, Permission> = self
            .permissions
            .find_active_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(roles.into_iter().map(|role| RoleView::expand(role, &lookup)).collect())
    }
}

fn required_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Role name is required"));
    }
    Ok(trimmed.to_string())
}
