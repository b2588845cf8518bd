//! In-memory implementation of the permission and role stores.
//!
//! State lives in maps guarded by `tokio::sync::RwLock`; all state is lost on restart.
//! Mutations take the write lock, so the active-name uniqueness check and the write
//! happen atomically, mirroring the partial unique index of the PostgreSQL backend.

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{name_key, PermissionStore, RoleStore, DUPLICATE_ROLE_NAME};
use crate::error::AppError;
use crate::models::pagination::SortOrder;
use crate::models::permission::{DeleteState, Permission, PermissionDef};
use crate::models::role::{NewRole, Role, RoleChanges, RoleQuery, RoleSortField};

#[derive(Clone, Default)]
pub struct InMemoryPermissionStore {
    /// key -> permission
    permissions: Arc<RwLock<HashMap<String, Permission>>>,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn upsert(&self, def: &PermissionDef) -> Result<Permission, AppError> {
        let mut permissions = self.permissions.write().await;
        let now = Utc::now();

        let permission = permissions
            .entry(def.key.clone())
            .and_modify(|existing| {
                existing.group = def.group.clone();
                existing.permission_type = def.permission_type.clone();
                existing.title = def.title.clone();
                existing.order = def.order;
                existing.category = def.category.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| Permission {
                id: Uuid::new_v4(),
                key: def.key.clone(),
                group: def.group.clone(),
                permission_type: def.permission_type.clone(),
                title: def.title.clone(),
                order: def.order,
                category: def.category.clone(),
                is_delete: DeleteState::Active,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            });

        Ok(permission.clone())
    }

    async fn list_active(&self) -> Result<Vec<Permission>, AppError> {
        let permissions = self.permissions.read().await;
        let mut active: Vec<Permission> = permissions
            .values()
            .filter(|p| p.is_delete.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.key.cmp(&b.key)));
        Ok(active)
    }

    async fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Permission>, AppError> {
        let permissions = self.permissions.read().await;
        Ok(permissions
            .values()
            .filter(|p| p.is_delete.is_active() && ids.contains(&p.id))
            .cloned()
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[derive(Clone, Default)]
pub struct InMemoryRoleStore {
    roles: Arc<RwLock<HashMap<Uuid, Role>>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn name_taken(roles: &HashMap<Uuid, Role>, name: &str, exclude_id: Option<Uuid>) -> bool {
    let key = name_key(name);
    roles.values().any(|role| {
        role.is_delete.is_active() && Some(role.id) != exclude_id && name_key(&role.name) == key
    })
}

fn compare_roles(a: &Role, b: &Role, field: RoleSortField) -> Ordering {
    let primary = match field {
        RoleSortField::Id => Ordering::Equal,
        // 与 postgres 后端的 lower(name), name 一致
        RoleSortField::Name => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
        RoleSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        RoleSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        RoleSortField::IsActive => a.is_active.cmp(&b.is_active),
        RoleSortField::DeletedAt => a.deleted_at.cmp(&b.deleted_at),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn find_by_name_ci(
        &self,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<Role>, AppError> {
        let key = name_key(name);
        let roles = self.roles.read().await;
        Ok(roles
            .values()
            .find(|role| {
                role.is_delete.is_active()
                    && Some(role.id) != exclude_id
                    && name_key(&role.name) == key
            })
            .cloned())
    }

    async fn insert(&self, role: NewRole) -> Result<Role, AppError> {
        let mut roles = self.roles.write().await;
        if name_taken(&roles, &role.name, None) {
            return Err(AppError::conflict(DUPLICATE_ROLE_NAME));
        }

        let now = Utc::now();
        let created = Role {
            id: Uuid::new_v4(),
            name: role.name,
            permissions: role.permissions,
            is_active: 1,
            is_delete: DeleteState::Active,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        roles.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, AppError> {
        let roles = self.roles.read().await;
        Ok(roles.get(&id).filter(|role| role.is_delete.is_active()).cloned())
    }

    async fn list(&self, query: &RoleQuery) -> Result<(Vec<Role>, i64), AppError> {
        let roles = self.roles.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);

        let mut matching: Vec<Role> = roles
            .values()
            .filter(|role| role.is_delete.is_active())
            .filter(|role| match &needle {
                Some(needle) => role.name.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let ordering = compare_roles(a, b, query.sort.field);
            match query.sort.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matching.len() as i64;
        let items = match &query.page {
            Some(window) => matching
                .into_iter()
                .skip(window.offset() as usize)
                .take(window.limit as usize)
                .collect(),
            None => matching,
        };

        Ok((items, total))
    }

    async fn update(&self, id: Uuid, changes: RoleChanges) -> Result<Option<Role>, AppError> {
        let mut roles = self.roles.write().await;

        if !roles.get(&id).is_some_and(|role| role.is_delete.is_active()) {
            return Ok(None);
        }
        if let Some(name) = &changes.name {
            if name_taken(&roles, name, Some(id)) {
                return Err(AppError::conflict(DUPLICATE_ROLE_NAME));
            }
        }

        let Some(role) = roles.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            role.name = name;
        }
        if let Some(permissions) = changes.permissions {
            role.permissions = permissions;
        }
        role.updated_at = Utc::now();

        Ok(Some(role.clone()))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut roles = self.roles.write().await;
        match roles.get_mut(&id).filter(|role| role.is_delete.is_active()) {
            Some(role) => {
                let now = Utc::now();
                role.is_delete = DeleteState::Deleted;
                role.deleted_at = Some(now);
                role.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
