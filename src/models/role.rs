//! Role domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use super::pagination::{PageRequest, SortOrder};
use super::permission::{DeleteState, Permission};
use crate::error::AppError;

/// Role record; `permissions` holds references to permission ids
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub permissions: Vec<Uuid>,
    /// 保留字段，当前没有任何操作读取或切换它
    pub is_active: i16,
    pub is_delete: DeleteState,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role with permission references resolved to full records
#[derive(Debug, Clone, Serialize)]
pub struct RoleView {
    pub id: Uuid,
    pub name: String,
    pub permissions: Vec<Permission>,
    pub is_active: i16,
    pub is_delete: DeleteState,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoleView {
    /// 按角色引用顺序展开权限；无法解析的引用不出现在视图中
    pub fn expand(role: Role, lookup: &HashMap<Uuid, Permission>) -> Self {
        let permissions = role
            .permissions
            .iter()
            .filter_map(|id| lookup.get(id).cloned())
            .collect();

        Self {
            id: role.id,
            name: role.name,
            permissions,
            is_active: role.is_active,
            is_delete: role.is_delete,
            deleted_at: role.deleted_at,
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}

/// Insert payload for the role store (name already trimmed)
#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub permissions: Vec<Uuid>,
}

/// Partial update merged onto an existing role
#[derive(Debug, Clone, Default)]
pub struct RoleChanges {
    pub name: Option<String>,
    pub permissions: Option<Vec<Uuid>>,
}

/// 可排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleSortField {
    Id,
    Name,
    #[default]
    CreatedAt,
    UpdatedAt,
    IsActive,
    DeletedAt,
}

impl RoleSortField {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim() {
            "id" => Ok(RoleSortField::Id),
            "name" => Ok(RoleSortField::Name),
            "created_at" | "createdAt" => Ok(RoleSortField::CreatedAt),
            "updated_at" | "updatedAt" => Ok(RoleSortField::UpdatedAt),
            "is_active" | "isActive" => Ok(RoleSortField::IsActive),
            "deleted_at" | "deletedAt" => Ok(RoleSortField::DeletedAt),
            other => Err(AppError::Validation(format!("Invalid sort field: {}", other))),
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            RoleSortField::Id => "id",
            RoleSortField::Name => "name",
            RoleSortField::CreatedAt => "created_at",
            RoleSortField::UpdatedAt => "updated_at",
            RoleSortField::IsActive => "is_active",
            RoleSortField::DeletedAt => "deleted_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSort {
    pub field: RoleSortField,
    pub order: SortOrder,
}

/// Store-level list query
#[derive(Debug, Clone, Default)]
pub struct RoleQuery {
    /// 名称的大小写不敏感子串匹配
    pub search: Option<String>,
    pub sort: RoleSort,
    pub page: Option<PageRequest>,
}

/// Create role request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<Uuid>,
}

/// Update role request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<Uuid>,
}

/// List roles query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleListParams {
    pub search: Option<String>,
    #[serde(alias = "sortField")]
    pub sort_field: Option<String>,
    #[serde(alias = "sortOrder")]
    pub sort_order: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl RoleListParams {
    pub fn into_query(self) -> Result<RoleQuery, AppError> {
        let field = match self.sort_field.as_deref() {
            Some(raw) if !raw.trim().is_empty() => RoleSortField::parse(raw)?,
            _ => RoleSortField::default(),
        };
        let order = match self.sort_order.as_deref() {
            Some(raw) if !raw.trim().is_empty() => SortOrder::parse(raw)?,
            _ => SortOrder::default(),
        };
        // 全空白视为不过滤，否则按原样做子串匹配
        let search = self.search.filter(|s| !s.trim().is_empty());

        Ok(RoleQuery {
            search,
            sort: RoleSort { field, order },
            page: PageRequest::from_parts(self.page, self.limit)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role_with(permissions: Vec<Uuid>) -> Role {
        Role {
            id: Uuid::new_v4(),
            name: "Editor".to_string(),
            permissions,
            is_active: 1,
            is_delete: DeleteState::Active,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn permission(key: &str) -> Permission {
        Permission {
            id: Uuid::new_v4(),
            key: key.to_string(),
            group: "Role".to_string(),
            permission_type: "read".to_string(),
            title: key.to_string(),
            order: 1,
            category: "rbac".to_string(),
            is_delete: DeleteState::Active,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_expand_keeps_reference_order_and_drops_dangling() {
        let read = permission("role.read");
        let write = permission("role.update");
        let dangling = Uuid::new_v4();
        let role = role_with(vec![write.id, dangling, read.id]);

        let lookup: HashMap<Uuid, Permission> = [read.clone(), write.clone()]
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let view = RoleView::expand(role, &lookup);
        let keys: Vec<&str> = view.permissions.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["role.update", "role.read"]);
    }

    #[test]
    fn test_sort_field_accepts_camel_case() {
        assert_eq!(RoleSortField::parse("createdAt").unwrap(), RoleSortField::CreatedAt);
        assert_eq!(RoleSortField::parse("is_active").unwrap(), RoleSortField::IsActive);
        assert_eq!(RoleSortField::parse("deletedAt").unwrap(), RoleSortField::DeletedAt);
        assert_eq!(RoleSortField::parse("id").unwrap(), RoleSortField::Id);
        assert!(RoleSortField::parse("password").is_err());
    }

    #[test]
    fn test_list_params_defaults() {
        let query = RoleListParams::default().into_query().unwrap();
        assert_eq!(query.sort.field, RoleSortField::CreatedAt);
        assert_eq!(query.sort.order, SortOrder::Desc);
        assert!(query.search.is_none());
        assert!(query.page.is_none());
    }

    #[test]
    fn test_list_params_blank_search_is_no_filter() {
        let params = RoleListParams {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(params.into_query().unwrap().search.is_none());
    }

    #[test]
    fn test_list_params_search_keeps_whitespace() {
        let params = RoleListParams {
            search: Some(" man".to_string()),
            ..Default::default()
        };
        assert_eq!(params.into_query().unwrap().search.as_deref(), Some(" man"));
    }

    #[test]
    fn test_create_request_rejects_empty_name() {
        let req = CreateRoleRequest {
            name: String::new(),
            permissions: vec![],
        };
        assert!(req.validate().is_err());
    }
}
