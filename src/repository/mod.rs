//! Database repository layer
//!
//! 权限目录与角色存储以 trait 形式暴露，提供 PostgreSQL 与内存两种后端。
//! 角色名唯一性由存储层保证（PostgreSQL 部分唯一索引 / 内存写锁内检查），
//! 服务层的重名检查只是提前返回。

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::permission::{Permission, PermissionDef};
use crate::models::role::{NewRole, Role, RoleChanges, RoleQuery};

pub mod memory;
pub mod permission_repo;
pub mod role_repo;

pub use memory::{InMemoryPermissionStore, InMemoryRoleStore};
pub use permission_repo::PermissionRepository;
pub use role_repo::RoleRepository;

/// 角色名冲突时返回给调用方的消息
pub const DUPLICATE_ROLE_NAME: &str = "duplicate role name";

/// Permission catalog storage
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// 按 key 插入或覆盖（标识、创建时间与删除状态保持不变）
    async fn upsert(&self, def: &PermissionDef) -> Result<Permission, AppError>;

    /// 所有未删除的权限，按 order、key 排序
    async fn list_active(&self) -> Result<Vec<Permission>, AppError>;

    /// 批量查找未删除的权限，用于角色引用展开
    async fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Permission>, AppError>;

    /// 依次 upsert 每条定义；首个失败即中止，已写入的不回滚
    async fn seed(&self, definitions: &[PermissionDef]) -> Result<usize, AppError> {
        for def in definitions {
            self.upsert(def).await?;
        }
        Ok(definitions.len())
    }

    fn backend_name(&self) -> &'static str;
}

/// Role storage; every read and write is restricted to non-deleted roles
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// 去除首尾空白后大小写不敏感的精确匹配，可排除一个 id
    async fn find_by_name_ci(
        &self,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<Role>, AppError>;

    async fn insert(&self, role: NewRole) -> Result<Role, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, AppError>;

    /// 返回 (当前窗口的角色, 匹配总数)
    async fn list(&self, query: &RoleQuery) -> Result<(Vec<Role>, i64), AppError>;

    /// 合并字段并刷新 updated_at；角色不存在或已删除时返回 None
    async fn update(&self, id: Uuid, changes: RoleChanges) -> Result<Option<Role>, AppError>;

    /// 软删除；角色不存在或已删除时返回 false
    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError>;

    fn backend_name(&self) -> &'static str;
}

/// 统一的名称比较键
pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// 把唯一索引冲突转换为 Conflict，其余存储错误原样返回
pub(crate) fn map_unique_violation(err: sqlx::Error) -> AppError {
    let err = AppError::from(err);
    if err.is_unique_violation() {
        AppError::conflict(DUPLICATE_ROLE_NAME)
    } else {
        err
    }
}

/// 构造 ILIKE 子串模式，转义通配符
pub(crate) fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
