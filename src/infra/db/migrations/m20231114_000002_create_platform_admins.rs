//! Migration: platform admins, the operators above every tenant.

use sea_orm_migration::prelude::*;

use super::foreign_keys::{self, ForeignKeySpec, OnDelete};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        foreign_keys::require_postgres(manager)?;

        manager
            .create_table(
                Table::create()
                    .table(PlatformAdmins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlatformAdmins::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(
                        ColumnDef::new(PlatformAdmins::Email)
                            .string_len(120)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PlatformAdmins::FirstName).string_len(80).not_null())
                    .col(ColumnDef::new(PlatformAdmins::LastName).string_len(80).not_null())
                    .col(ColumnDef::new(PlatformAdmins::PasswordHash).string_len(255).not_null())
                    .col(
                        ColumnDef::new(PlatformAdmins::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(PlatformAdmins::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(PlatformAdmins::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PlatformAdmins::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        if !manager.has_column("tenants", "created_by_platform_admin").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Tenants::Table)
                        .add_column(ColumnDef::new(Tenants::CreatedByPlatformAdmin).uuid().null())
                        .to_owned(),
                )
                .await?;
        }
        if !manager.has_column("tenants", "super_admin_id").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Tenants::Table)
                        .add_column(ColumnDef::new(Tenants::SuperAdminId).uuid().null())
                        .to_owned(),
                )
                .await?;
        }

        // Platform-level accounts live in `users` without a tenant
        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE users ALTER COLUMN tenant_id DROP NOT NULL")
            .await?;

        let admin_columns = [
            (
                "admin_level",
                ColumnDef::new(Users::AdminLevel)
                    .string_len(20)
                    .not_null()
                    .default("EMPLOYEE")
                    .to_owned(),
            ),
            (
                "is_super_admin",
                ColumnDef::new(Users::IsSuperAdmin)
                    .boolean()
                    .not_null()
                    .default(false)
                    .to_owned(),
            ),
            (
                "is_super_super_admin",
                ColumnDef::new(Users::IsSuperSuperAdmin)
                    .boolean()
                    .not_null()
                    .default(false)
                    .to_owned(),
            ),
            ("created_by", ColumnDef::new(Users::CreatedBy).uuid().null().to_owned()),
        ];
        for (name, column) in admin_columns {
            if !manager.has_column("users", name).await? {
                manager
                    .alter_table(
                        Table::alter()
                            .table(Users::Table)
                            .add_column(column)
                            .to_owned(),
                    )
                    .await?;
            }
        }

        for target in [
            ForeignKeySpec::new("platform_admins", "created_by", "platform_admins", OnDelete::SetNull),
            ForeignKeySpec::new(
                "tenants",
                "created_by_platform_admin",
                "platform_admins",
                OnDelete::SetNull,
            ),
            ForeignKeySpec::new("users", "created_by", "users", OnDelete::SetNull),
        ] {
            foreign_keys::ensure(manager, &target).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // CASCADE drops the tenants.created_by_platform_admin constraint with it
        manager
            .drop_table(
                Table::drop()
                    .table(PlatformAdmins::Table)
                    .if_exists()
                    .cascade()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum PlatformAdmins {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    PasswordHash,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Tenants {
    Table,
    CreatedByPlatformAdmin,
    SuperAdminId,
}

#[derive(Iden)]
enum Users {
    Table,
    AdminLevel,
    IsSuperAdmin,
    IsSuperSuperAdmin,
    CreatedBy,
}
