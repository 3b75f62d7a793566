//! Application services layer - Use cases and business logic.
//!
//! Lifecycle managers depend on the Unit of Work abstraction; handlers depend
//! on the service traits through the container.

mod admin_auth_service;
mod admin_service;
pub mod authorization;
pub mod container;
mod platform_admin_service;
mod tenant_service;
mod token_service;

// Service Container
pub use container::{parallel, ServiceContainer, Services};

// Service traits and implementations
pub use admin_auth_service::{AdminAuthService, AdminAuthenticator, AdminSession};
pub use admin_service::{AdminManager, AdminService, CreateAdmin, UpdateAdmin};
pub use platform_admin_service::{
    CreatePlatformAdmin, PlatformAdminManager, PlatformAdminService, PlatformSession,
};
pub use tenant_service::{TenantManager, TenantService};
pub use token_service::{Claims, IssuedToken, JwtTokens, TokenService};

#[cfg(any(test, feature = "test-utils"))]
pub use admin_auth_service::MockAdminAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use admin_service::MockAdminService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use platform_admin_service::MockPlatformAdminService;
#[cfg(any(test, feature = "test-utils"))]
pub use tenant_service::MockTenantService;
#[cfg(any(test, feature = "test-utils"))]
pub use token_service::MockTokenService;
