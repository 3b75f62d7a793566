//! Infrastructure layer - External systems integration
//!
//! - Identity store: connection pool, migrations, repositories
//! - Unit of Work for transaction management
//! - Redis for liveness and login rate limiting

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{
    AdminRepository, AdminStore, PlatformAdminRepository, PlatformAdminStore, TenantRepository,
    TenantStore, UserRepository, UserStore,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxAdminRepository, TxPlatformAdminRepository,
    TxTenantRepository, TxUserRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAdminRepository, MockPlatformAdminRepository, MockTenantRepository, MockUserRepository,
};
