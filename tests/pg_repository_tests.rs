//! PostgreSQL 存储层集成测试
//! 需要可用的数据库：TEST_DATABASE_URL=... cargo test -- --ignored

use rbac_admin::{
    error::AppError,
    models::role::{NewRole, RoleListParams},
    repository::{RoleRepository, RoleStore},
    services::RbacService,
};
use serial_test::serial;
use uuid::Uuid;

mod common;
use common::{create_test_config, permission_id, sample_defs, setup_test_db};

#[tokio::test]
#[ignore]
#[serial]
async fn test_pg_seed_is_idempotent() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let service = RbacService::postgres(pool);

    service.seed_permissions(&sample_defs()).await.unwrap();
    let before = service.list_permissions().await.unwrap();
    service.seed_permissions(&sample_defs()).await.unwrap();
    let after = service.list_permissions().await.unwrap();

    assert_eq!(before.len(), 3);
    assert_eq!(after.len(), 3);
    let ids: Vec<Uuid> = before.iter().map(|p| p.id).collect();
    assert_eq!(ids, after.iter().map(|p| p.id).collect::<Vec<_>>());
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_pg_unique_index_rejects_duplicate_name() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let store = RoleRepository::new(pool);

    store
        .insert(NewRole {
            name: "Manager".to_string(),
            permissions: vec![],
        })
        .await
        .unwrap();

    // 绕过服务层的预检查，直接命中部分唯一索引
    let result = store
        .insert(NewRole {
            name: " manager ".to_string(),
            permissions: vec![],
        })
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_pg_role_lifecycle() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let service = RbacService::postgres(pool);

    service.seed_permissions(&sample_defs()).await.unwrap();
    let catalog = service.list_permissions().await.unwrap();
    let read = permission_id(&catalog, "perm.read");
    let write = permission_id(&catalog, "perm.write");

    let role = service.create_role("Editor", vec![write, read]).await.unwrap();
    let view = service.get_role(role.id).await.unwrap();
    let keys: Vec<&str> = view.permissions.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, vec!["perm.write", "perm.read"]);

    let updated = service.update_role(role.id, "EDITOR", vec![read]).await.unwrap();
    assert_eq!(updated.name, "EDITOR");
    assert_eq!(updated.permissions.len(), 1);

    service.delete_role(role.id).await.unwrap();
    assert!(matches!(service.get_role(role.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(service.delete_role(role.id).await, Err(AppError::NotFound(_))));

    assert!(service.create_role("editor", vec![]).await.is_ok());
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_pg_list_search_sort_and_pagination() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let service = RbacService::postgres(pool);

    for i in 0..25 {
        service.create_role(&format!("role_{:02}", i), vec![]).await.unwrap();
    }
    service.create_role("50%_off", vec![]).await.unwrap();

    let result = service
        .list_roles(RoleListParams {
            search: Some("ROLE".to_string()),
            sort_field: Some("name".to_string()),
            sort_order: Some("asc".to_string()),
            page: Some(2),
            limit: Some(10),
        })
        .await
        .unwrap();
    assert_eq!(result.items.len(), 10);
    assert_eq!(result.items[0].name, "role_10");
    let pagination = result.pagination.unwrap();
    assert_eq!(pagination.total, 25);
    assert_eq!(pagination.total_pages, 3);

    // 通配符按字面量匹配
    let literal = service
        .list_roles(RoleListParams {
            search: Some("%_".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(literal.items.len(), 1);
    assert_eq!(literal.items[0].name, "50%_off");
}
