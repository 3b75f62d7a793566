//! Repository layer - Data access abstraction
//!
//! Each repository is a mockable trait plus a connection-bound store. Query
//! functions generic over `ConnectionTrait` are shared with the
//! transaction-bound repositories of the unit of work.

pub(crate) mod admin_repository;
pub mod entities;
pub(crate) mod platform_admin_repository;
pub(crate) mod tenant_repository;
pub(crate) mod user_repository;

pub(crate) use admin_repository as admin_queries;
pub(crate) use platform_admin_repository as platform_admin_queries;
pub(crate) use tenant_repository as tenant_queries;
pub(crate) use user_repository as user_queries;

pub use admin_repository::{AdminRepository, AdminStore, ADMIN_EMAIL_CONFLICT};
pub use platform_admin_repository::{
    PlatformAdminRepository, PlatformAdminStore, PLATFORM_ADMIN_EMAIL_CONFLICT,
};
pub use tenant_repository::{TenantRepository, TenantStore, TENANT_CODE_CONFLICT};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use admin_repository::MockAdminRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use platform_admin_repository::MockPlatformAdminRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use tenant_repository::MockTenantRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
