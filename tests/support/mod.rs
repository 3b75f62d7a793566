//! Shared harness for store-level tests: an in-memory SQLite database whose
//! schema is derived from the entity definitions, plus seed helpers.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend,
    EntityTrait, PaginatorTrait, Schema, Set,
};
use uuid::Uuid;

use tenant_core::domain::{
    Admin, AdminLevel, ModuleScope, NewAdmin, NewPlatformAdmin, Password, PlatformAdmin,
    ProvisionedTenant, TenantProvisioning,
};
use tenant_core::infra::repositories::entities::{
    admin, admin_assignment, admin_onboarding_request, admin_permission, audit_log, building,
    floor, invoice, notification, organization, plan, platform_admin, role, subscription, tenant,
    tenant_domain, usage_event, user, webhook,
};
use tenant_core::infra::{
    AdminRepository, AdminStore, Persistence, PlatformAdminRepository, PlatformAdminStore,
};
use tenant_core::services::{TenantManager, TenantService};

pub const PASSWORD: &str = "SecurePass123!";

/// Open a fresh in-memory database with every table created.
///
/// One connection only: each SQLite in-memory connection is its own database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.expect("sqlite connects");
    db.execute_unprepared("PRAGMA foreign_keys = ON")
        .await
        .expect("foreign keys enabled");

    let schema = Schema::new(DbBackend::Sqlite);
    macro_rules! create {
        ($($entity:path),+ $(,)?) => {
            $(
                let statement = schema.create_table_from_entity($entity);
                db.execute(db.get_database_backend().build(&statement))
                    .await
                    .expect("table created");
            )+
        };
    }

    create!(
        plan::Entity,
        platform_admin::Entity,
        tenant::Entity,
        admin::Entity,
        organization::Entity,
        building::Entity,
        floor::Entity,
        role::Entity,
        user::Entity,
        tenant_domain::Entity,
        subscription::Entity,
        invoice::Entity,
        usage_event::Entity,
        notification::Entity,
        webhook::Entity,
        audit_log::Entity,
        admin_assignment::Entity,
        admin_permission::Entity,
        admin_onboarding_request::Entity,
    );

    db
}

pub fn tenant_manager(db: &DatabaseConnection) -> TenantManager<Persistence> {
    TenantManager::new(Arc::new(Persistence::new(db.clone())))
}

pub async fn seed_platform_admin(db: &DatabaseConnection, email: &str) -> PlatformAdmin {
    PlatformAdminStore::new(db.clone())
        .create(NewPlatformAdmin {
            email: email.to_string(),
            first_name: "Platform".to_string(),
            last_name: "Operator".to_string(),
            password_hash: Password::new(PASSWORD).unwrap().into_string(),
            created_by: None,
        })
        .await
        .expect("platform admin seeded")
}

pub fn provisioning(code: &str, superadmin_email: &str, platform_admin: Uuid) -> TenantProvisioning {
    TenantProvisioning {
        tenant_name: format!("{code} Corp"),
        tenant_code: code.to_string(),
        plan_id: None,
        superadmin_email: superadmin_email.to_string(),
        superadmin_first_name: "Root".to_string(),
        superadmin_last_name: "Admin".to_string(),
        superadmin_password: PASSWORD.to_string(),
        created_by_platform_admin: platform_admin,
    }
}

/// Provision a tenant with its superadmin through the lifecycle manager.
pub async fn seed_tenant(
    db: &DatabaseConnection,
    code: &str,
    superadmin_email: &str,
    platform_admin: Uuid,
) -> ProvisionedTenant {
    tenant_manager(db)
        .create_tenant_with_superadmin(provisioning(code, superadmin_email, platform_admin))
        .await
        .expect("tenant provisioned")
}

/// Insert a regular admin directly, bypassing creator checks.
pub async fn seed_admin(db: &DatabaseConnection, tenant_id: Uuid, email: &str) -> Admin {
    AdminStore::new(db.clone())
        .create(NewAdmin {
            tenant_id,
            email: email.to_string(),
            first_name: Some("Module".to_string()),
            last_name: Some("Admin".to_string()),
            password_hash: Password::new(PASSWORD).unwrap().into_string(),
            level: AdminLevel::Admin,
            module_scope: Some(ModuleScope::Dwar),
            created_by: None,
        })
        .await
        .expect("admin seeded")
}

/// Ids of the organisation rows a seeded user is placed in.
pub struct Placement {
    pub organization_id: Uuid,
    pub building_id: Uuid,
    pub floor_id: Uuid,
    pub role_id: Uuid,
}

pub async fn seed_placement(db: &DatabaseConnection, tenant_id: Uuid) -> Placement {
    let now = Utc::now();

    let organization = organization::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        name: Set("Head Office".to_string()),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    let building = building::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        organization_id: Set(Some(organization.id)),
        name: Set("Tower A".to_string()),
        address: Set(None),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    let floor = floor::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        building_id: Set(building.id),
        name: Set("Level 3".to_string()),
        level: Set(Some(3)),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    let role = role::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(Some(tenant_id)),
        name: Set("Engineer".to_string()),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    Placement {
        organization_id: organization.id,
        building_id: building.id,
        floor_id: floor.id,
        role_id: role.id,
    }
}

pub async fn seed_user(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    email: &str,
    placement: Option<&Placement>,
) -> user::Model {
    let now = Utc::now();
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(Some(tenant_id)),
        organization_id: Set(placement.map(|p| p.organization_id)),
        building_id: Set(placement.map(|p| p.building_id)),
        floor_id: Set(placement.map(|p| p.floor_id)),
        role_id: Set(placement.map(|p| p.role_id)),
        first_name: Set(Some("Employee".to_string())),
        last_name: Set(None),
        email: Set(email.to_string()),
        employee_id: Set(None),
        department: Set(None),
        employee_grade: Set(None),
        phone: Set(None),
        password_hash: Set("not-a-login".to_string()),
        module_scope: Set("CORE".to_string()),
        is_active: Set(true),
        created_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

/// One row in every tenant-scoped table that is not seeded elsewhere.
pub async fn seed_tenant_scoped_rows(db: &DatabaseConnection, tenant_id: Uuid, admin_id: Uuid) {
    let now = Utc::now();
    let suffix = Uuid::new_v4().simple().to_string();

    tenant_domain::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        domain: Set(format!("{suffix}.example.com")),
        verified: Set(false),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    let subscription = subscription::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        plan_id: Set(None),
        status: Set("ACTIVE".to_string()),
        started_at: Set(now),
        ends_at: Set(None),
    }
    .insert(db)
    .await
    .unwrap();

    invoice::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        subscription_id: Set(Some(subscription.id)),
        amount: Set(49.0),
        status: Set("PAID".to_string()),
        issued_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    usage_event::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        module: Set("DWAR".to_string()),
        event: Set("visitor_checked_in".to_string()),
        quantity: Set(1),
        recorded_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    notification::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        user_id: Set(None),
        kind: Set("info".to_string()),
        message: Set("Welcome".to_string()),
        is_read: Set(false),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    webhook::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        url: Set("https://hooks.example.com/tenant".to_string()),
        events: Set("admin.created,admin.deleted".to_string()),
        secret: Set(None),
        is_active: Set(true),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    audit_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        user_id: Set(None),
        action: Set("tenant.created".to_string()),
        entity: Set(Some("tenant".to_string())),
        entity_id: Set(Some(tenant_id)),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    admin_assignment::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        admin_id: Set(admin_id),
        building_id: Set(None),
        floor_id: Set(None),
        created_by: Set(Some(admin_id)),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    admin_permission::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        admin_id: Set(admin_id),
        permission_key: Set("visitors.approve".to_string()),
        granted_by: Set(Some(admin_id)),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    admin_onboarding_request::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        admin_id: Set(Some(admin_id)),
        email: Set(format!("onboard-{suffix}@example.com")),
        module_scope: Set(Some("DWAR".to_string())),
        status: Set("PENDING".to_string()),
        approved_by: Set(None),
        created_by: Set(Some(admin_id)),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
}

/// Rows referencing `tenant_id` in each tenant-scoped table, by table name.
pub async fn tenant_row_counts(
    db: &DatabaseConnection,
    tenant_id: Uuid,
) -> Vec<(&'static str, u64)> {
    use sea_orm::{ColumnTrait, QueryFilter};

    macro_rules! count {
        ($($name:literal => $module:ident),+ $(,)?) => {
            vec![
                $((
                    $name,
                    $module::Entity::find()
                        .filter($module::Column::TenantId.eq(tenant_id))
                        .count(db)
                        .await
                        .unwrap(),
                )),+
            ]
        };
    }

    count!(
        "admins" => admin,
        "users" => user,
        "organizations" => organization,
        "buildings" => building,
        "floors" => floor,
        "roles" => role,
        "domains" => tenant_domain,
        "subscriptions" => subscription,
        "invoices" => invoice,
        "usage_events" => usage_event,
        "notifications" => notification,
        "webhooks" => webhook,
        "audit_logs" => audit_log,
        "admin_assignments" => admin_assignment,
        "admin_permissions" => admin_permission,
        "admin_onboarding_requests" => admin_onboarding_request,
    )
}

pub async fn count_tenants(db: &DatabaseConnection) -> u64 {
    tenant::Entity::find().count(db).await.unwrap()
}

pub async fn count_admins(db: &DatabaseConnection) -> u64 {
    admin::Entity::find().count(db).await.unwrap()
}
