//! Migration: move superadmins and admins out of `users` into `admins`.
//!
//! Rows are copied with their ids so existing references stay valid, every
//! admin reference is re-pointed at the new table, then the admin columns are
//! dropped from `users`. The down path only drops `admins`: copied accounts are
//! not restored into `users`.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DbBackend, Statement};

use super::foreign_keys::{self, ForeignKeySpec, OnDelete, ADMIN_REPOINTS};

#[derive(DeriveMigrationName)]
pub struct Migration;

const COPY_SUPER_ADMINS: &str = r#"
INSERT INTO admins (
    id, tenant_id, email, first_name, last_name, password_hash,
    admin_level, is_super_admin, module_scope, is_active, created_at, updated_at
)
SELECT id, tenant_id, email, first_name, last_name, password_hash,
       'SUPER_ADMIN', TRUE, NULL, COALESCE(is_active, TRUE),
       COALESCE(created_at, NOW()), COALESCE(updated_at, NOW())
FROM users
WHERE (is_super_admin = TRUE OR admin_level = 'SUPER_ADMIN')
  AND tenant_id IS NOT NULL
ON CONFLICT DO NOTHING
"#;

/// Module codes an admin may be scoped to. Anything else copies as `ALL`.
const KNOWN_SCOPES: [&str; 6] = ["DWAR", "SANGRAH", "SAMMILAN", "SANDESH", "FRESH_SERVE", "ALL"];

const COPY_ADMINS: &str = r#"
WITH known_scopes(code) AS (
    VALUES ('DWAR'), ('SANGRAH'), ('SAMMILAN'), ('SANDESH'), ('FRESH_SERVE'), ('ALL')
)
INSERT INTO admins (
    id, tenant_id, email, first_name, last_name, password_hash,
    admin_level, is_super_admin, module_scope, is_active, created_at, updated_at
)
SELECT id, tenant_id, email, first_name, last_name, password_hash,
       'ADMIN', FALSE,
       CASE WHEN UPPER(TRIM(module_scope)) IN (SELECT code FROM known_scopes)
            THEN UPPER(TRIM(module_scope))
            ELSE 'ALL'
       END,
       COALESCE(is_active, TRUE),
       COALESCE(created_at, NOW()), COALESCE(updated_at, NOW())
FROM users
WHERE admin_level IS NOT NULL
  AND admin_level NOT IN ('EMPLOYEE', 'SUPER_ADMIN')
  AND (is_super_admin IS NULL OR is_super_admin = FALSE)
  AND tenant_id IS NOT NULL
ON CONFLICT DO NOTHING
"#;

const COUNT_UNKNOWN_SCOPES: &str = r#"
SELECT COUNT(*) FROM users
WHERE admin_level IS NOT NULL
  AND admin_level NOT IN ('EMPLOYEE', 'SUPER_ADMIN')
  AND (is_super_admin IS NULL OR is_super_admin = FALSE)
  AND tenant_id IS NOT NULL
  AND (module_scope IS NULL
       OR UPPER(TRIM(module_scope)) NOT IN ('DWAR', 'SANGRAH', 'SAMMILAN', 'SANDESH', 'FRESH_SERVE', 'ALL'))
"#;

const ADMINS_UPDATED_AT: &str = r#"
CREATE OR REPLACE FUNCTION update_admins_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

DO $$
BEGIN
    IF NOT EXISTS (SELECT 1 FROM pg_trigger WHERE tgname = 'update_admins_updated_at') THEN
        CREATE TRIGGER update_admins_updated_at
        BEFORE UPDATE ON admins
        FOR EACH ROW EXECUTE FUNCTION update_admins_updated_at();
    END IF;
END
$$;
"#;

/// Columns of `users` that only described admin accounts
const LEGACY_USER_COLUMNS: [&str; 3] = ["admin_level", "is_super_admin", "is_super_super_admin"];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        foreign_keys::require_postgres(manager)?;
        let conn = manager.get_connection();

        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admins::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Admins::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Admins::UserId).uuid().null())
                    .col(ColumnDef::new(Admins::Email).string_len(120).not_null().unique_key())
                    .col(ColumnDef::new(Admins::FirstName).string_len(80).null())
                    .col(ColumnDef::new(Admins::LastName).string_len(80).null())
                    .col(ColumnDef::new(Admins::PasswordHash).text().not_null())
                    .col(
                        ColumnDef::new(Admins::AdminLevel)
                            .string_len(20)
                            .not_null()
                            .default("ADMIN"),
                    )
                    .col(
                        ColumnDef::new(Admins::IsSuperAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Admins::ModuleScope).string_len(50).null())
                    .col(ColumnDef::new(Admins::CreatedBy).uuid().null())
                    .col(ColumnDef::new(Admins::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Admins::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Admins::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_admins_tenant_id", Admins::TenantId),
            ("idx_admins_is_super_admin", Admins::IsSuperAdmin),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Admins::Table)
                        .col(column)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        for target in [
            ForeignKeySpec::new("admins", "tenant_id", "tenants", OnDelete::Cascade),
            ForeignKeySpec::new("admins", "user_id", "users", OnDelete::SetNull),
            ForeignKeySpec::new("admins", "created_by", "admins", OnDelete::SetNull),
        ] {
            foreign_keys::ensure(manager, &target).await?;
        }

        // Only while the legacy columns are still there; a re-run finds them gone
        if manager.has_column("users", "admin_level").await?
            && manager.has_column("users", "is_super_admin").await?
        {
            let unknown: i64 = match conn
                .query_one(Statement::from_string(DbBackend::Postgres, COUNT_UNKNOWN_SCOPES))
                .await?
            {
                Some(row) => row.try_get_by_index(0)?,
                None => 0,
            };
            if unknown > 0 {
                tracing::warn!(
                    admins = unknown,
                    known = ?KNOWN_SCOPES,
                    "Admins without a known module scope copied as ALL"
                );
            }

            conn.execute_unprepared(COPY_SUPER_ADMINS).await?;
            conn.execute_unprepared(COPY_ADMINS).await?;
        }

        if manager.has_column("admin_onboarding_requests", "user_id").await?
            && !manager.has_column("admin_onboarding_requests", "admin_id").await?
        {
            conn.execute_unprepared(
                "ALTER TABLE admin_onboarding_requests RENAME COLUMN user_id TO admin_id",
            )
            .await?;
        }

        for target in ADMIN_REPOINTS {
            if foreign_keys::ensure(manager, target).await? {
                tracing::info!(
                    table = target.table,
                    column = target.column,
                    "Re-pointed admin reference to admins"
                );
            }
        }

        for column in LEGACY_USER_COLUMNS {
            if manager.has_column("users", column).await? {
                manager
                    .alter_table(
                        Table::alter()
                            .table(Users::Table)
                            .drop_column(Alias::new(column))
                            .to_owned(),
                    )
                    .await?;
            }
        }

        conn.execute_unprepared(ADMINS_UPDATED_AT).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        conn.execute_unprepared("DROP TRIGGER IF EXISTS update_admins_updated_at ON admins")
            .await?;
        conn.execute_unprepared("DROP FUNCTION IF EXISTS update_admins_updated_at()")
            .await?;

        // CASCADE also removes the re-pointed constraints
        manager
            .drop_table(Table::drop().table(Admins::Table).if_exists().cascade().to_owned())
            .await
    }
}

#[derive(Iden)]
enum Admins {
    Table,
    Id,
    TenantId,
    UserId,
    Email,
    FirstName,
    LastName,
    PasswordHash,
    AdminLevel,
    IsSuperAdmin,
    ModuleScope,
    CreatedBy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VALID_MODULE_SCOPES;

    #[test]
    fn test_known_scopes_match_module_codes() {
        let mut known = KNOWN_SCOPES.to_vec();
        let mut valid = VALID_MODULE_SCOPES.to_vec();
        known.sort_unstable();
        valid.sort_unstable();
        assert_eq!(known, valid);

        for code in KNOWN_SCOPES {
            assert!(COPY_ADMINS.contains(&format!("('{}')", code)));
            assert!(COUNT_UNKNOWN_SCOPES.contains(&format!("'{}'", code)));
        }
    }

    #[test]
    fn test_unknown_scope_copies_as_all() {
        assert!(COPY_ADMINS.contains("ELSE 'ALL'"));
    }
}
