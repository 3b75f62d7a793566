//! Admin lifecycle and login against a real store, including the end-to-end
//! flows from tenant provisioning to admin management.

mod support;

use std::sync::Arc;

use chrono::Duration;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use support::*;
use tenant_core::domain::{AdminFilter, AdminLevel, ModuleScope, PrincipalType};
use tenant_core::errors::AppError;
use tenant_core::infra::repositories::entities::admin;
use tenant_core::infra::Persistence;
use tenant_core::services::{
    AdminAuthService, AdminAuthenticator, AdminManager, AdminService, CreateAdmin,
    CreatePlatformAdmin, JwtTokens, PlatformAdminManager, PlatformAdminService, TenantService,
    TokenService, UpdateAdmin,
};

const SECRET: &[u8] = b"integration-secret-at-least-32-bytes!!";
const ISSUER: &str = "tenant-core-test";

fn tokens() -> Arc<dyn TokenService> {
    Arc::new(JwtTokens::new(SECRET, ISSUER, Duration::hours(1)))
}

fn admin_manager(db: &DatabaseConnection) -> AdminManager<Persistence> {
    AdminManager::new(Arc::new(Persistence::new(db.clone())))
}

fn admin_auth(db: &DatabaseConnection) -> AdminAuthenticator<Persistence> {
    AdminAuthenticator::new(Arc::new(Persistence::new(db.clone())), tokens())
}

fn create_admin_input(tenant_id: Uuid, created_by: Uuid, email: &str, scope: &str) -> CreateAdmin {
    CreateAdmin {
        email: email.to_string(),
        first_name: "Ops".to_string(),
        last_name: "Admin".to_string(),
        password: PASSWORD.to_string(),
        module_scope: scope.to_string(),
        tenant_id,
        created_by,
    }
}

#[tokio::test]
async fn test_superadmin_login_carries_tenant_binding() {
    let db = setup_db().await;
    let platform_admin = seed_platform_admin(&db, "ops@platform.io").await;
    let acme = seed_tenant(&db, "ACME", "root@acme.io", platform_admin.id).await;

    let session = admin_auth(&db)
        .login("root@acme.io".to_string(), PASSWORD.to_string())
        .await
        .unwrap();

    assert_eq!(session.tenant.id, acme.tenant.id);
    let principal = tokens().verify(&session.token.access_token).unwrap();
    assert_eq!(principal.principal_type, PrincipalType::SuperAdmin);
    assert_eq!(principal.tenant_id, Some(acme.tenant.id));
    assert_eq!(principal.id, acme.superadmin.id);
}

#[tokio::test]
async fn test_superadmin_creates_admin_with_normalized_scope() {
    let db = setup_db().await;
    let platform_admin = seed_platform_admin(&db, "ops@platform.io").await;
    let acme = seed_tenant(&db, "ACME", "root@acme.io", platform_admin.id).await;

    let created = admin_manager(&db)
        .create_admin(create_admin_input(
            acme.tenant.id,
            acme.superadmin.id,
            "ops@acme.io",
            "dwar",
        ))
        .await
        .unwrap();

    let row = admin::Entity::find_by_id(created.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.module_scope.as_deref(), Some("DWAR"));
    assert!(!row.is_super_admin);
    assert_eq!(row.admin_level, "ADMIN");
    assert_eq!(row.created_by, Some(acme.superadmin.id));
    assert_ne!(row.password_hash, PASSWORD);

    let session = admin_auth(&db)
        .login("ops@acme.io".to_string(), PASSWORD.to_string())
        .await
        .unwrap();
    let principal = tokens().verify(&session.token.access_token).unwrap();
    assert_eq!(principal.principal_type, PrincipalType::Admin);
}

#[tokio::test]
async fn test_superadmin_cannot_be_deleted_or_updated_here() {
    let db = setup_db().await;
    let platform_admin = seed_platform_admin(&db, "ops@platform.io").await;
    let acme = seed_tenant(&db, "ACME", "root@acme.io", platform_admin.id).await;
    let manager = admin_manager(&db);

    let deleted = manager
        .delete_admin(acme.superadmin.id, acme.tenant.id)
        .await;
    assert!(matches!(deleted, Err(AppError::Forbidden(_))));

    let updated = manager
        .update_admin(
            acme.superadmin.id,
            acme.tenant.id,
            UpdateAdmin {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(updated, Err(AppError::Forbidden(_))));

    let row = admin::Entity::find_by_id(acme.superadmin.id)
        .one(&db)
        .await
        .unwrap();
    assert!(row.is_some_and(|r| r.is_active));
}

#[tokio::test]
async fn test_deleted_tenant_users_are_not_found() {
    let db = setup_db().await;
    let platform_admin = seed_platform_admin(&db, "ops@platform.io").await;
    let acme = seed_tenant(&db, "ACME", "root@acme.io", platform_admin.id).await;
    let admin = seed_admin(&db, acme.tenant.id, "ops@acme.io").await;
    seed_user(&db, acme.tenant.id, "jane@acme.io", None).await;
    seed_tenant_scoped_rows(&db, acme.tenant.id, admin.id).await;

    let tenants = tenant_manager(&db);
    tenants.delete_tenant(acme.tenant.id).await.unwrap();

    let users = tenants.tenant_users(acme.tenant.id).await;
    assert!(matches!(users, Err(AppError::NotFound(_))));

    let counts = tenant_row_counts(&db, acme.tenant.id).await;
    for table in ["admins", "users", "admin_assignments"] {
        let count = counts.iter().find(|(name, _)| *name == table).unwrap().1;
        assert_eq!(count, 0, "{table} still references the deleted tenant");
    }
}

#[tokio::test]
async fn test_unknown_module_scope_inserts_nothing() {
    let db = setup_db().await;
    let platform_admin = seed_platform_admin(&db, "ops@platform.io").await;
    let acme = seed_tenant(&db, "ACME", "root@acme.io", platform_admin.id).await;

    for scope in ["WAREHOUSE", "", "dwar-x"] {
        let result = admin_manager(&db)
            .create_admin(create_admin_input(
                acme.tenant.id,
                acme.superadmin.id,
                "ops@acme.io",
                scope,
            ))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))), "{scope:?}");
    }

    assert_eq!(count_admins(&db).await, 1);
}

#[tokio::test]
async fn test_short_password_inserts_nothing() {
    let db = setup_db().await;
    let platform_admin = seed_platform_admin(&db, "ops@platform.io").await;
    let acme = seed_tenant(&db, "ACME", "root@acme.io", platform_admin.id).await;

    let mut input =
        create_admin_input(acme.tenant.id, acme.superadmin.id, "ops@acme.io", "SANGRAH");
    input.password = "short".to_string();

    let result = admin_manager(&db).create_admin(input).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(count_admins(&db).await, 1);
}

#[tokio::test]
async fn test_only_superadmin_of_same_tenant_creates_admins() {
    let db = setup_db().await;
    let platform_admin = seed_platform_admin(&db, "ops@platform.io").await;
    let acme = seed_tenant(&db, "ACME", "root@acme.io", platform_admin.id).await;
    let globex = seed_tenant(&db, "GLOBEX", "root@globex.io", platform_admin.id).await;
    let regular = seed_admin(&db, acme.tenant.id, "ops@acme.io").await;
    let manager = admin_manager(&db);

    let by_regular = manager
        .create_admin(create_admin_input(acme.tenant.id, regular.id, "a@acme.io", "DWAR"))
        .await;
    assert!(matches!(by_regular, Err(AppError::Forbidden(_))));

    let cross_tenant = manager
        .create_admin(create_admin_input(
            acme.tenant.id,
            globex.superadmin.id,
            "b@acme.io",
            "DWAR",
        ))
        .await;
    assert!(matches!(cross_tenant, Err(AppError::Forbidden(_))));

    let unknown_creator = manager
        .create_admin(create_admin_input(acme.tenant.id, Uuid::new_v4(), "c@acme.io", "DWAR"))
        .await;
    assert!(matches!(unknown_creator, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_racing_duplicate_emails_yield_one_conflict() {
    let db = setup_db().await;
    let platform_admin = seed_platform_admin(&db, "ops@platform.io").await;
    let acme = seed_tenant(&db, "ACME", "root@acme.io", platform_admin.id).await;
    let manager = admin_manager(&db);

    let (first, second) = tokio::join!(
        manager.create_admin(create_admin_input(
            acme.tenant.id,
            acme.superadmin.id,
            "dup@acme.io",
            "DWAR",
        )),
        manager.create_admin(create_admin_input(
            acme.tenant.id,
            acme.superadmin.id,
            "dup@acme.io",
            "SANDESH",
        )),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(AppError::Conflict(_))))
            .count(),
        1
    );
    assert_eq!(count_admins(&db).await, 2);
}

#[tokio::test]
async fn test_tenant_scoped_lookup_hides_other_tenants() {
    let db = setup_db().await;
    let platform_admin = seed_platform_admin(&db, "ops@platform.io").await;
    let acme = seed_tenant(&db, "ACME", "root@acme.io", platform_admin.id).await;
    let globex = seed_tenant(&db, "GLOBEX", "root@globex.io", platform_admin.id).await;
    let globex_admin = seed_admin(&db, globex.tenant.id, "ops@globex.io").await;
    let manager = admin_manager(&db);

    let scoped = manager
        .get_admin(globex_admin.id, Some(acme.tenant.id))
        .await;
    assert!(matches!(scoped, Err(AppError::NotFound(_))));

    let unscoped = manager.get_admin(globex_admin.id, None).await.unwrap();
    assert_eq!(unscoped.admin.tenant_id, globex.tenant.id);

    // Writes through another tenant behave as if the row did not exist.
    let deleted = manager.delete_admin(globex_admin.id, acme.tenant.id).await;
    assert!(matches!(deleted, Err(AppError::NotFound(_))));
    assert!(manager.get_admin(globex_admin.id, None).await.is_ok());
}

#[tokio::test]
async fn test_list_filters_and_creator_annotation() {
    let db = setup_db().await;
    let platform_admin = seed_platform_admin(&db, "ops@platform.io").await;
    let acme = seed_tenant(&db, "ACME", "root@acme.io", platform_admin.id).await;
    let manager = admin_manager(&db);

    let dwar = manager
        .create_admin(create_admin_input(acme.tenant.id, acme.superadmin.id, "d@acme.io", "DWAR"))
        .await
        .unwrap();
    manager
        .create_admin(create_admin_input(acme.tenant.id, acme.superadmin.id, "s@acme.io", "SANDESH"))
        .await
        .unwrap();
    manager
        .update_admin(
            dwar.id,
            acme.tenant.id,
            UpdateAdmin {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let regular = manager
        .list_tenant_admins(acme.tenant.id, AdminFilter::default())
        .await
        .unwrap();
    assert_eq!(regular.len(), 2);
    assert!(regular.iter().all(|r| r.admin.level == AdminLevel::Admin));
    assert!(regular
        .iter()
        .all(|r| r.creator.as_ref().map(|c| c.email.as_str()) == Some("root@acme.io")));

    let everyone = manager
        .list_tenant_admins(
            acme.tenant.id,
            AdminFilter {
                include_superadmin: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(everyone.len(), 3);

    let inactive_dwar = manager
        .list_tenant_admins(
            acme.tenant.id,
            AdminFilter {
                include_superadmin: false,
                module_scope: Some(ModuleScope::Dwar),
                is_active: Some(false),
            },
        )
        .await
        .unwrap();
    assert_eq!(inactive_dwar.len(), 1);
    assert_eq!(inactive_dwar[0].admin.id, dwar.id);
}

#[tokio::test]
async fn test_update_revalidates_module_scope() {
    let db = setup_db().await;
    let platform_admin = seed_platform_admin(&db, "ops@platform.io").await;
    let acme = seed_tenant(&db, "ACME", "root@acme.io", platform_admin.id).await;
    let admin = seed_admin(&db, acme.tenant.id, "ops@acme.io").await;
    let manager = admin_manager(&db);

    let rejected = manager
        .update_admin(
            admin.id,
            acme.tenant.id,
            UpdateAdmin {
                module_scope: Some("billing".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(rejected, Err(AppError::Validation(_))));

    let updated = manager
        .update_admin(
            admin.id,
            acme.tenant.id,
            UpdateAdmin {
                first_name: Some("Renamed".to_string()),
                module_scope: Some(" fresh_serve ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.module_scope, Some(ModuleScope::FreshServe));
    assert_eq!(updated.first_name.as_deref(), Some("Renamed"));
    assert_eq!(updated.last_name.as_deref(), Some("Admin"));
}

#[tokio::test]
async fn test_admin_login_failures_are_indistinguishable() {
    let db = setup_db().await;
    let platform_admin = seed_platform_admin(&db, "ops@platform.io").await;
    let acme = seed_tenant(&db, "ACME", "root@acme.io", platform_admin.id).await;
    let admin = seed_admin(&db, acme.tenant.id, "ops@acme.io").await;
    admin_manager(&db)
        .update_admin(
            admin.id,
            acme.tenant.id,
            UpdateAdmin {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let auth = admin_auth(&db);

    for (email, password) in [
        ("nobody@acme.io", PASSWORD),
        ("root@acme.io", "WrongPass123!"),
        ("ops@acme.io", PASSWORD),
    ] {
        let result = auth.login(email.to_string(), password.to_string()).await;
        assert!(
            matches!(result, Err(AppError::InvalidCredentials)),
            "{email} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_platform_admin_lifecycle() {
    let db = setup_db().await;
    let root = seed_platform_admin(&db, "ops@platform.io").await;
    let manager = PlatformAdminManager::new(Arc::new(Persistence::new(db.clone())), tokens());

    let second = manager
        .create_platform_admin(CreatePlatformAdmin {
            email: "second@platform.io".to_string(),
            first_name: "Second".to_string(),
            last_name: "Operator".to_string(),
            password: PASSWORD.to_string(),
            created_by: Some(root.id),
        })
        .await
        .unwrap();
    assert_eq!(second.created_by, Some(root.id));

    let duplicate = manager
        .create_platform_admin(CreatePlatformAdmin {
            email: "second@platform.io".to_string(),
            first_name: "Again".to_string(),
            last_name: "Operator".to_string(),
            password: PASSWORD.to_string(),
            created_by: None,
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let listed = manager.list_platform_admins().await.unwrap();
    assert_eq!(listed.len(), 2);
    let annotated = listed.iter().find(|r| r.admin.id == second.id).unwrap();
    assert_eq!(
        annotated.creator.as_ref().map(|c| c.email.as_str()),
        Some("ops@platform.io")
    );

    let session = manager
        .login("second@platform.io".to_string(), PASSWORD.to_string())
        .await
        .unwrap();
    let principal = tokens().verify(&session.token.access_token).unwrap();
    assert_eq!(principal.principal_type, PrincipalType::PlatformAdmin);
    assert_eq!(principal.tenant_id, None);

    let wrong = manager
        .login("second@platform.io".to_string(), "WrongPass123!".to_string())
        .await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
}
