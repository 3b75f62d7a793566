//! Foreign key plans shared by the migrations.
//!
//! A [`ForeignKeySpec`] is the desired end state of one referencing column.
//! [`ensure`] converges the live schema onto it: an existing constraint that
//! already matches is left alone, anything else on that column is dropped and
//! recreated, so running a step twice is a no-op.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DbBackend, Statement};

/// Delete behaviour of a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    SetNull,
}

impl OnDelete {
    pub fn action(self) -> ForeignKeyAction {
        match self {
            OnDelete::Cascade => ForeignKeyAction::Cascade,
            OnDelete::SetNull => ForeignKeyAction::SetNull,
        }
    }

    /// Spelling used by `information_schema.referential_constraints.delete_rule`
    pub fn rule(self) -> &'static str {
        match self {
            OnDelete::Cascade => "CASCADE",
            OnDelete::SetNull => "SET NULL",
        }
    }
}

/// Target shape of a single-column foreign key onto `references.id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeySpec {
    pub table: &'static str,
    pub column: &'static str,
    pub references: &'static str,
    pub on_delete: OnDelete,
}

impl ForeignKeySpec {
    pub const fn new(
        table: &'static str,
        column: &'static str,
        references: &'static str,
        on_delete: OnDelete,
    ) -> Self {
        Self {
            table,
            column,
            references,
            on_delete,
        }
    }

    pub fn constraint_name(&self) -> String {
        format!("fk_{}_{}", self.table, self.column)
    }

    pub fn create_statement(&self) -> ForeignKeyCreateStatement {
        ForeignKey::create()
            .name(self.constraint_name())
            .from(Alias::new(self.table), Alias::new(self.column))
            .to(Alias::new(self.references), Alias::new("id"))
            .on_delete(self.on_delete.action())
            .on_update(ForeignKeyAction::NoAction)
            .to_owned()
    }

    /// Statement removing rows or references the new constraint would reject.
    fn clear_dangling_sql(&self) -> String {
        let orphan = format!(
            "\"{col}\" IS NOT NULL AND NOT EXISTS (SELECT 1 FROM \"{target}\" t WHERE t.\"id\" = \"{table}\".\"{col}\")",
            table = self.table,
            col = self.column,
            target = self.references,
        );
        match self.on_delete {
            OnDelete::Cascade => format!("DELETE FROM \"{}\" WHERE {}", self.table, orphan),
            OnDelete::SetNull => format!(
                "UPDATE \"{}\" SET \"{}\" = NULL WHERE {}",
                self.table, self.column, orphan
            ),
        }
    }
}

/// Admin references moved from `users` onto `admins` when the two were split.
pub const ADMIN_REPOINTS: &[ForeignKeySpec] = &[
    ForeignKeySpec::new("tenants", "super_admin_id", "admins", OnDelete::SetNull),
    ForeignKeySpec::new("admin_assignments", "admin_id", "admins", OnDelete::Cascade),
    ForeignKeySpec::new("admin_assignments", "created_by", "admins", OnDelete::SetNull),
    ForeignKeySpec::new("admin_onboarding_requests", "admin_id", "admins", OnDelete::SetNull),
    ForeignKeySpec::new("admin_onboarding_requests", "approved_by", "admins", OnDelete::SetNull),
    ForeignKeySpec::new("admin_onboarding_requests", "created_by", "admins", OnDelete::SetNull),
    ForeignKeySpec::new("admin_permissions", "admin_id", "admins", OnDelete::Cascade),
    ForeignKeySpec::new("admin_permissions", "granted_by", "admins", OnDelete::SetNull),
];

/// Every table owned by a tenant through its `tenant_id` column.
pub const TENANT_SCOPED_TABLES: &[&str] = &[
    "admins",
    "users",
    "admin_assignments",
    "admin_permissions",
    "admin_onboarding_requests",
    "organizations",
    "buildings",
    "floors",
    "roles",
    "domains",
    "subscriptions",
    "invoices",
    "usage_events",
    "notifications",
    "webhooks",
    "audit_logs",
];

/// Cascade specs for every tenant-scoped table
pub fn tenant_cascades() -> Vec<ForeignKeySpec> {
    TENANT_SCOPED_TABLES
        .iter()
        .map(|table| ForeignKeySpec::new(table, "tenant_id", "tenants", OnDelete::Cascade))
        .collect()
}

/// A foreign key constraint as found in the live schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingForeignKey {
    pub name: String,
    pub references: String,
    pub delete_rule: String,
}

const FOREIGN_KEYS_ON_COLUMN: &str = r#"
SELECT tc.constraint_name::text, ccu.table_name::text, rc.delete_rule::text
FROM information_schema.table_constraints tc
JOIN information_schema.key_column_usage kcu
  ON kcu.constraint_name = tc.constraint_name AND kcu.table_schema = tc.table_schema
JOIN information_schema.constraint_column_usage ccu
  ON ccu.constraint_name = tc.constraint_name AND ccu.table_schema = tc.table_schema
JOIN information_schema.referential_constraints rc
  ON rc.constraint_name = tc.constraint_name AND rc.constraint_schema = tc.table_schema
WHERE tc.constraint_type = 'FOREIGN KEY'
  AND tc.table_schema = current_schema()
  AND tc.table_name = $1
  AND kcu.column_name = $2
"#;

/// Foreign keys currently declared on `table.column`.
pub async fn existing(
    manager: &SchemaManager<'_>,
    table: &str,
    column: &str,
) -> Result<Vec<ExistingForeignKey>, DbErr> {
    let rows = manager
        .get_connection()
        .query_all(Statement::from_sql_and_values(
            DbBackend::Postgres,
            FOREIGN_KEYS_ON_COLUMN,
            [table.into(), column.into()],
        ))
        .await?;

    rows.iter()
        .map(|row| -> Result<ExistingForeignKey, DbErr> {
            Ok(ExistingForeignKey {
                name: row.try_get_by_index(0)?,
                references: row.try_get_by_index(1)?,
                delete_rule: row.try_get_by_index(2)?,
            })
        })
        .collect()
}

/// Converge `table.column` onto `target`. Returns whether anything changed.
///
/// Skipped when the table or column does not exist yet.
pub async fn ensure(manager: &SchemaManager<'_>, target: &ForeignKeySpec) -> Result<bool, DbErr> {
    if !manager.has_table(target.table).await? || !manager.has_column(target.table, target.column).await? {
        return Ok(false);
    }

    let current = existing(manager, target.table, target.column).await?;
    let satisfied = current
        .iter()
        .any(|fk| fk.references == target.references && fk.delete_rule == target.on_delete.rule());
    if satisfied && current.len() == 1 {
        return Ok(false);
    }

    for fk in current {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(&fk.name)
                    .table(Alias::new(target.table))
                    .to_owned(),
            )
            .await?;
    }

    manager
        .get_connection()
        .execute_unprepared(&target.clear_dangling_sql())
        .await?;
    manager.create_foreign_key(target.create_statement()).await?;

    Ok(true)
}

/// Create `target` only when `table.column` carries no foreign key at all.
///
/// Used for references a later step re-points: an existing constraint,
/// whatever it targets, is left alone together with the rows it guards.
pub async fn create_if_absent(
    manager: &SchemaManager<'_>,
    target: &ForeignKeySpec,
) -> Result<bool, DbErr> {
    if !manager.has_table(target.table).await? || !manager.has_column(target.table, target.column).await? {
        return Ok(false);
    }
    if !existing(manager, target.table, target.column).await?.is_empty() {
        return Ok(false);
    }

    manager
        .get_connection()
        .execute_unprepared(&target.clear_dangling_sql())
        .await?;
    manager.create_foreign_key(target.create_statement()).await?;

    Ok(true)
}

/// Fail fast on backends the migration history was never written for.
pub fn require_postgres(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    match manager.get_database_backend() {
        DbBackend::Postgres => Ok(()),
        other => Err(DbErr::Migration(format!(
            "migrations require PostgreSQL, got {:?}",
            other
        ))),
    }
}
