//! Migration: every `tenant_id` reference deletes with its tenant.
//!
//! Databases that predate this history may carry `NO ACTION` constraints on
//! some tenant-owned tables; those are recreated as `ON DELETE CASCADE`.

use sea_orm_migration::prelude::*;

use super::foreign_keys;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        foreign_keys::require_postgres(manager)?;

        for target in foreign_keys::tenant_cascades() {
            if foreign_keys::ensure(manager, &target).await? {
                tracing::info!(table = target.table, "Recreated tenant_id foreign key with CASCADE");
            }
        }

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Ok(())
    }
}
