//! 内置权限定义（种子数据）

use crate::models::permission::PermissionDef;

const CRUD: [(&str, &str); 4] = [
    ("create", "Create"),
    ("read", "View"),
    ("update", "Update"),
    ("delete", "Delete"),
];

fn crud_group(
    defs: &mut Vec<PermissionDef>,
    resource: &str,
    group: &str,
    plural: &str,
    category: &str,
) {
    for (action, verb) in CRUD {
        let order = defs.len() as i32 + 1;
        defs.push(PermissionDef::new(
            &format!("{}.{}", resource, action),
            group,
            action,
            &format!("{} {}", verb, plural),
            order,
            category,
        ));
    }
}

/// 后台管理的默认权限目录，order 依次递增
pub fn default_permission_defs() -> Vec<PermissionDef> {
    let mut defs = Vec::new();

    crud_group(&mut defs, "role", "Role", "roles", "rbac");

    let order = defs.len() as i32;
    defs.push(PermissionDef::new(
        "permission.read",
        "Permission",
        "read",
        "View permissions",
        order + 1,
        "rbac",
    ));
    defs.push(PermissionDef::new(
        "permission.seed",
        "Permission",
        "seed",
        "Seed permissions",
        order + 2,
        "rbac",
    ));

    crud_group(&mut defs, "country", "Country", "countries", "master");
    crud_group(&mut defs, "state", "State", "states", "master");

    defs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_keys_are_unique() {
        let defs = default_permission_defs();
        let keys: HashSet<&str> = defs.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys.len(), defs.len());
    }

    #[test]
    fn test_default_order_is_ascending() {
        let defs = default_permission_defs();
        let orders: Vec<i32> = defs.iter().map(|d| d.order).collect();
        let expected: Vec<i32> = (1..=defs.len() as i32).collect();
        assert_eq!(orders, expected);
    }

    #[test]
    fn test_default_covers_role_management() {
        let defs = default_permission_defs();
        for key in ["role.create", "role.read", "role.update", "role.delete", "permission.seed"] {
            assert!(defs.iter().any(|d| d.key == key), "missing {}", key);
        }
    }
}
