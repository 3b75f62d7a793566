//! Migration: tenant-owned tables. Admin bookkeeping tables still reference
//! `users` here; they move onto `admins` in the next step.

use sea_orm_migration::prelude::*;

use super::foreign_keys::{self, ForeignKeySpec, OnDelete};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn uuid_pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .uuid()
        .not_null()
        .primary_key()
        .default(Expr::cust("gen_random_uuid()"))
        .to_owned()
}

fn uuid_col<T: IntoIden>(col: T, nullable: bool) -> ColumnDef {
    let mut def = ColumnDef::new(col);
    def.uuid();
    if nullable {
        def.null();
    } else {
        def.not_null();
    }
    def
}

fn timestamp_now<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

/// References created after the tables exist, so creation order does not matter.
const REFERENCES: &[ForeignKeySpec] = &[
    ForeignKeySpec::new("tenants", "plan_id", "plans", OnDelete::SetNull),
    ForeignKeySpec::new("users", "organization_id", "organizations", OnDelete::SetNull),
    ForeignKeySpec::new("users", "building_id", "buildings", OnDelete::SetNull),
    ForeignKeySpec::new("users", "floor_id", "floors", OnDelete::SetNull),
    ForeignKeySpec::new("users", "role_id", "roles", OnDelete::SetNull),
    ForeignKeySpec::new("buildings", "organization_id", "organizations", OnDelete::SetNull),
    ForeignKeySpec::new("floors", "building_id", "buildings", OnDelete::Cascade),
    ForeignKeySpec::new("subscriptions", "plan_id", "plans", OnDelete::SetNull),
    ForeignKeySpec::new("invoices", "subscription_id", "subscriptions", OnDelete::SetNull),
    ForeignKeySpec::new("notifications", "user_id", "users", OnDelete::SetNull),
    ForeignKeySpec::new("audit_logs", "user_id", "users", OnDelete::SetNull),
];

/// Admin bookkeeping references in their pre-`admins` shape. Created only
/// where no constraint exists yet, so a replay leaves re-pointed ones intact.
const LEGACY_ADMIN_REFERENCES: &[ForeignKeySpec] = &[
    ForeignKeySpec::new("admin_assignments", "admin_id", "users", OnDelete::Cascade),
    ForeignKeySpec::new("admin_assignments", "created_by", "users", OnDelete::SetNull),
    ForeignKeySpec::new("admin_permissions", "admin_id", "users", OnDelete::Cascade),
    ForeignKeySpec::new("admin_permissions", "granted_by", "users", OnDelete::SetNull),
    ForeignKeySpec::new("admin_onboarding_requests", "user_id", "users", OnDelete::SetNull),
    ForeignKeySpec::new("admin_onboarding_requests", "approved_by", "users", OnDelete::SetNull),
    ForeignKeySpec::new("admin_onboarding_requests", "created_by", "users", OnDelete::SetNull),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        foreign_keys::require_postgres(manager)?;

        let tables = [
            Table::create()
                .table(Plans::Table)
                .if_not_exists()
                .col(uuid_pk(Plans::Id))
                .col(ColumnDef::new(Plans::Name).string_len(100).not_null())
                .col(ColumnDef::new(Plans::Price).double().not_null().default(0.0))
                .col(ColumnDef::new(Plans::MaxUsers).integer().null())
                .col(timestamp_now(Plans::CreatedAt))
                .to_owned(),
            Table::create()
                .table(Organizations::Table)
                .if_not_exists()
                .col(uuid_pk(Organizations::Id))
                .col(uuid_col(Organizations::TenantId, false))
                .col(ColumnDef::new(Organizations::Name).string_len(150).not_null())
                .col(timestamp_now(Organizations::CreatedAt))
                .to_owned(),
            Table::create()
                .table(Buildings::Table)
                .if_not_exists()
                .col(uuid_pk(Buildings::Id))
                .col(uuid_col(Buildings::TenantId, false))
                .col(uuid_col(Buildings::OrganizationId, true))
                .col(ColumnDef::new(Buildings::Name).string_len(150).not_null())
                .col(ColumnDef::new(Buildings::Address).text().null())
                .col(timestamp_now(Buildings::CreatedAt))
                .to_owned(),
            Table::create()
                .table(Floors::Table)
                .if_not_exists()
                .col(uuid_pk(Floors::Id))
                .col(uuid_col(Floors::TenantId, false))
                .col(uuid_col(Floors::BuildingId, false))
                .col(ColumnDef::new(Floors::Name).string_len(100).not_null())
                .col(ColumnDef::new(Floors::Level).integer().null())
                .col(timestamp_now(Floors::CreatedAt))
                .to_owned(),
            Table::create()
                .table(Roles::Table)
                .if_not_exists()
                .col(uuid_pk(Roles::Id))
                .col(uuid_col(Roles::TenantId, true))
                .col(ColumnDef::new(Roles::Name).string_len(100).not_null())
                .col(timestamp_now(Roles::CreatedAt))
                .to_owned(),
            Table::create()
                .table(Domains::Table)
                .if_not_exists()
                .col(uuid_pk(Domains::Id))
                .col(uuid_col(Domains::TenantId, false))
                .col(ColumnDef::new(Domains::Domain).string_len(255).not_null().unique_key())
                .col(ColumnDef::new(Domains::Verified).boolean().not_null().default(false))
                .col(timestamp_now(Domains::CreatedAt))
                .to_owned(),
            Table::create()
                .table(Subscriptions::Table)
                .if_not_exists()
                .col(uuid_pk(Subscriptions::Id))
                .col(uuid_col(Subscriptions::TenantId, false))
                .col(uuid_col(Subscriptions::PlanId, true))
                .col(ColumnDef::new(Subscriptions::Status).string_len(20).not_null())
                .col(timestamp_now(Subscriptions::StartedAt))
                .col(
                    ColumnDef::new(Subscriptions::EndsAt)
                        .timestamp_with_time_zone()
                        .null(),
                )
                .to_owned(),
            Table::create()
                .table(Invoices::Table)
                .if_not_exists()
                .col(uuid_pk(Invoices::Id))
                .col(uuid_col(Invoices::TenantId, false))
                .col(uuid_col(Invoices::SubscriptionId, true))
                .col(ColumnDef::new(Invoices::Amount).double().not_null())
                .col(ColumnDef::new(Invoices::Status).string_len(20).not_null())
                .col(timestamp_now(Invoices::IssuedAt))
                .to_owned(),
            Table::create()
                .table(UsageEvents::Table)
                .if_not_exists()
                .col(uuid_pk(UsageEvents::Id))
                .col(uuid_col(UsageEvents::TenantId, false))
                .col(ColumnDef::new(UsageEvents::Module).string_len(50).not_null())
                .col(ColumnDef::new(UsageEvents::Event).string_len(100).not_null())
                .col(ColumnDef::new(UsageEvents::Quantity).integer().not_null().default(1))
                .col(timestamp_now(UsageEvents::RecordedAt))
                .to_owned(),
            Table::create()
                .table(Notifications::Table)
                .if_not_exists()
                .col(uuid_pk(Notifications::Id))
                .col(uuid_col(Notifications::TenantId, false))
                .col(uuid_col(Notifications::UserId, true))
                .col(ColumnDef::new(Notifications::Type).string_len(50).not_null())
                .col(ColumnDef::new(Notifications::Message).text().not_null())
                .col(ColumnDef::new(Notifications::IsRead).boolean().not_null().default(false))
                .col(timestamp_now(Notifications::CreatedAt))
                .to_owned(),
            Table::create()
                .table(Webhooks::Table)
                .if_not_exists()
                .col(uuid_pk(Webhooks::Id))
                .col(uuid_col(Webhooks::TenantId, false))
                .col(ColumnDef::new(Webhooks::Url).text().not_null())
                .col(ColumnDef::new(Webhooks::Events).text().not_null())
                .col(ColumnDef::new(Webhooks::Secret).string_len(255).null())
                .col(ColumnDef::new(Webhooks::IsActive).boolean().not_null().default(true))
                .col(timestamp_now(Webhooks::CreatedAt))
                .to_owned(),
            Table::create()
                .table(AuditLogs::Table)
                .if_not_exists()
                .col(uuid_pk(AuditLogs::Id))
                .col(uuid_col(AuditLogs::TenantId, false))
                .col(uuid_col(AuditLogs::UserId, true))
                .col(ColumnDef::new(AuditLogs::Action).string_len(100).not_null())
                .col(ColumnDef::new(AuditLogs::Entity).string_len(100).null())
                .col(uuid_col(AuditLogs::EntityId, true))
                .col(timestamp_now(AuditLogs::CreatedAt))
                .to_owned(),
            Table::create()
                .table(AdminAssignments::Table)
                .if_not_exists()
                .col(uuid_pk(AdminAssignments::Id))
                .col(uuid_col(AdminAssignments::TenantId, false))
                .col(uuid_col(AdminAssignments::AdminId, false))
                .col(uuid_col(AdminAssignments::BuildingId, true))
                .col(uuid_col(AdminAssignments::FloorId, true))
                .col(uuid_col(AdminAssignments::CreatedBy, true))
                .col(timestamp_now(AdminAssignments::CreatedAt))
                .to_owned(),
            Table::create()
                .table(AdminPermissions::Table)
                .if_not_exists()
                .col(uuid_pk(AdminPermissions::Id))
                .col(uuid_col(AdminPermissions::TenantId, false))
                .col(uuid_col(AdminPermissions::AdminId, false))
                .col(ColumnDef::new(AdminPermissions::PermissionKey).string_len(100).not_null())
                .col(uuid_col(AdminPermissions::GrantedBy, true))
                .col(timestamp_now(AdminPermissions::CreatedAt))
                .to_owned(),
            Table::create()
                .table(AdminOnboardingRequests::Table)
                .if_not_exists()
                .col(uuid_pk(AdminOnboardingRequests::Id))
                .col(uuid_col(AdminOnboardingRequests::TenantId, false))
                .col(uuid_col(AdminOnboardingRequests::UserId, true))
                .col(
                    ColumnDef::new(AdminOnboardingRequests::Email)
                        .string_len(120)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(AdminOnboardingRequests::ModuleScope).string_len(50).null())
                .col(
                    ColumnDef::new(AdminOnboardingRequests::Status)
                        .string_len(20)
                        .not_null()
                        .default("PENDING"),
                )
                .col(uuid_col(AdminOnboardingRequests::ApprovedBy, true))
                .col(uuid_col(AdminOnboardingRequests::CreatedBy, true))
                .col(timestamp_now(AdminOnboardingRequests::CreatedAt))
                .to_owned(),
        ];

        for table in tables {
            manager.create_table(table).await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("uq_admin_permissions_tenant_admin_key")
                    .table(AdminPermissions::Table)
                    .col(AdminPermissions::TenantId)
                    .col(AdminPermissions::AdminId)
                    .col(AdminPermissions::PermissionKey)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        for target in REFERENCES.iter().copied().chain(foreign_keys::tenant_cascades()) {
            foreign_keys::ensure(manager, &target).await?;
        }
        for target in LEGACY_ADMIN_REFERENCES {
            foreign_keys::create_if_absent(manager, target).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let tables = [
            "admin_onboarding_requests",
            "admin_permissions",
            "admin_assignments",
            "audit_logs",
            "webhooks",
            "notifications",
            "usage_events",
            "invoices",
            "subscriptions",
            "domains",
            "roles",
            "floors",
            "buildings",
            "organizations",
            "plans",
        ];
        for table in tables {
            manager
                .drop_table(
                    Table::drop()
                        .table(Alias::new(table))
                        .if_exists()
                        .cascade()
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Plans {
    Table,
    Id,
    Name,
    Price,
    MaxUsers,
    CreatedAt,
}

#[derive(Iden)]
enum Organizations {
    Table,
    Id,
    TenantId,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Buildings {
    Table,
    Id,
    TenantId,
    OrganizationId,
    Name,
    Address,
    CreatedAt,
}

#[derive(Iden)]
enum Floors {
    Table,
    Id,
    TenantId,
    BuildingId,
    Name,
    Level,
    CreatedAt,
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
    TenantId,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Domains {
    Table,
    Id,
    TenantId,
    Domain,
    Verified,
    CreatedAt,
}

#[derive(Iden)]
enum Subscriptions {
    Table,
    Id,
    TenantId,
    PlanId,
    Status,
    StartedAt,
    EndsAt,
}

#[derive(Iden)]
enum Invoices {
    Table,
    Id,
    TenantId,
    SubscriptionId,
    Amount,
    Status,
    IssuedAt,
}

#[derive(Iden)]
enum UsageEvents {
    Table,
    Id,
    TenantId,
    Module,
    Event,
    Quantity,
    RecordedAt,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    TenantId,
    UserId,
    Type,
    Message,
    IsRead,
    CreatedAt,
}

#[derive(Iden)]
enum Webhooks {
    Table,
    Id,
    TenantId,
    Url,
    Events,
    Secret,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum AuditLogs {
    Table,
    Id,
    TenantId,
    UserId,
    Action,
    Entity,
    EntityId,
    CreatedAt,
}

#[derive(Iden)]
enum AdminAssignments {
    Table,
    Id,
    TenantId,
    AdminId,
    BuildingId,
    FloorId,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum AdminPermissions {
    Table,
    Id,
    TenantId,
    AdminId,
    PermissionKey,
    GrantedBy,
    CreatedAt,
}

#[derive(Iden)]
enum AdminOnboardingRequests {
    Table,
    Id,
    TenantId,
    UserId,
    Email,
    ModuleScope,
    Status,
    ApprovedBy,
    CreatedBy,
    CreatedAt,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::db::migrations::foreign_keys::ADMIN_REPOINTS;

    fn repointed(target: &ForeignKeySpec) -> bool {
        ADMIN_REPOINTS
            .iter()
            .any(|r| r.table == target.table && r.column == target.column)
    }

    #[test]
    fn test_repointed_columns_are_never_converged_back() {
        for target in REFERENCES {
            assert!(!repointed(target), "{}.{} is re-pointed later", target.table, target.column);
        }
        for target in LEGACY_ADMIN_REFERENCES {
            assert_eq!(target.references, "users");
        }
        assert!(LEGACY_ADMIN_REFERENCES.iter().any(repointed));
    }
}
