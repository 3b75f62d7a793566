//! Database migrations.
//!
//! Forward-only history tracked in `seaql_migrations`. Names follow the
//! pattern m{YYYYMMDD}_{NNNNNN}_{description}; every step checks the live
//! schema first so applying it twice changes nothing.

use sea_orm_migration::prelude::*;

pub mod foreign_keys;
mod m20231114_000001_create_core_tables;
mod m20231114_000002_create_platform_admins;
mod m20231114_000003_create_tenant_scoped_tables;
mod m20231114_000004_separate_admins_from_users;
mod m20231114_000005_ensure_tenant_cascade;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20231114_000001_create_core_tables::Migration),
            Box::new(m20231114_000002_create_platform_admins::Migration),
            Box::new(m20231114_000003_create_tenant_scoped_tables::Migration),
            Box::new(m20231114_000004_separate_admins_from_users::Migration),
            Box::new(m20231114_000005_ensure_tenant_cascade::Migration),
        ]
    }
}
