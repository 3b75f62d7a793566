//! Migration: tenants and users in their original shape, where tenant admins
//! were still rows of `users` flagged through `admin_level`.

use sea_orm_migration::prelude::*;

use super::foreign_keys::{self, ForeignKeySpec, OnDelete};

#[derive(DeriveMigrationName)]
pub struct Migration;

const UPDATED_AT_FUNCTION: &str = r#"
CREATE OR REPLACE FUNCTION update_updated_at_column()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
"#;

const TENANTS_TRIGGER: &str = r#"
DO $$
BEGIN
    IF NOT EXISTS (SELECT 1 FROM pg_trigger WHERE tgname = 'update_tenants_updated_at') THEN
        CREATE TRIGGER update_tenants_updated_at
        BEFORE UPDATE ON tenants
        FOR EACH ROW EXECUTE FUNCTION update_updated_at_column();
    END IF;
END
$$;
"#;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        foreign_keys::require_postgres(manager)?;

        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tenants::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Tenants::Name).string_len(150).not_null())
                    .col(ColumnDef::new(Tenants::Code).string_len(50).not_null().unique_key())
                    .col(ColumnDef::new(Tenants::PlanId).uuid().null())
                    .col(
                        ColumnDef::new(Tenants::Status)
                            .string_len(20)
                            .not_null()
                            .default("ACTIVE"),
                    )
                    .col(ColumnDef::new(Tenants::CreatedByPlatformAdmin).uuid().null())
                    .col(ColumnDef::new(Tenants::SuperAdminId).uuid().null())
                    .col(
                        ColumnDef::new(Tenants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tenants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Users::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Users::OrganizationId).uuid().null())
                    .col(ColumnDef::new(Users::BuildingId).uuid().null())
                    .col(ColumnDef::new(Users::FloorId).uuid().null())
                    .col(ColumnDef::new(Users::RoleId).uuid().null())
                    .col(ColumnDef::new(Users::FirstName).string_len(80).null())
                    .col(ColumnDef::new(Users::LastName).string_len(80).null())
                    .col(ColumnDef::new(Users::Email).string_len(120).not_null().unique_key())
                    .col(ColumnDef::new(Users::EmployeeId).string_len(50).null().unique_key())
                    .col(ColumnDef::new(Users::Department).string_len(100).null())
                    .col(ColumnDef::new(Users::EmployeeGrade).string_len(50).null())
                    .col(ColumnDef::new(Users::Phone).string_len(20).null())
                    .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                    .col(
                        ColumnDef::new(Users::ModuleScope)
                            .string_len(50)
                            .not_null()
                            .default("CORE"),
                    )
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(Users::AdminLevel)
                            .string_len(20)
                            .not_null()
                            .default("EMPLOYEE"),
                    )
                    .col(ColumnDef::new(Users::IsSuperAdmin).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Users::IsSuperSuperAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_tenant_id")
                    .table(Users::Table)
                    .col(Users::TenantId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        for target in [
            ForeignKeySpec::new("users", "tenant_id", "tenants", OnDelete::Cascade),
            ForeignKeySpec::new("users", "created_by", "users", OnDelete::SetNull),
        ] {
            foreign_keys::ensure(manager, &target).await?;
        }
        // Re-pointed at `admins` later; never pulled back onto `users`
        foreign_keys::create_if_absent(
            manager,
            &ForeignKeySpec::new("tenants", "super_admin_id", "users", OnDelete::SetNull),
        )
        .await?;

        let conn = manager.get_connection();
        conn.execute_unprepared(UPDATED_AT_FUNCTION).await?;
        conn.execute_unprepared(TENANTS_TRIGGER).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        conn.execute_unprepared("DROP TRIGGER IF EXISTS update_tenants_updated_at ON tenants")
            .await?;
        conn.execute_unprepared("DROP FUNCTION IF EXISTS update_updated_at_column() CASCADE")
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().cascade().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenants::Table).if_exists().cascade().to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tenants {
    Table,
    Id,
    Name,
    Code,
    PlanId,
    Status,
    CreatedByPlatformAdmin,
    SuperAdminId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    TenantId,
    OrganizationId,
    BuildingId,
    FloorId,
    RoleId,
    FirstName,
    LastName,
    Email,
    EmployeeId,
    Department,
    EmployeeGrade,
    Phone,
    PasswordHash,
    ModuleScope,
    IsActive,
    CreatedBy,
    AdminLevel,
    IsSuperAdmin,
    IsSuperSuperAdmin,
    CreatedAt,
    UpdatedAt,
}
