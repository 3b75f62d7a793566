//! Domain layer - Core business entities and logic
//!
//! Identity model of the platform: platform admins, tenants, tenant admins
//! and users, plus the principal every request is evaluated as.

pub mod admin;
pub mod module_scope;
pub mod password;
pub mod platform_admin;
pub mod principal;
pub mod tenant;
pub mod user;

pub use admin::{
    AccountRef, Admin, AdminChanges, AdminFilter, AdminLevel, AdminRecord, AdminResponse,
    NewAdmin,
};
pub use module_scope::ModuleScope;
pub use password::Password;
pub use platform_admin::{
    NewPlatformAdmin, PlatformAdmin, PlatformAdminRecord, PlatformAdminResponse,
};
pub use principal::{Principal, PrincipalType};
pub use tenant::{
    NewTenant, PlatformAdminSummary, ProvisionedTenant, ProvisionedTenantResponse,
    SuperAdminSummary, Tenant, TenantAnalytics, TenantDetails, TenantProvisioning,
    TenantResponse,
};
pub use user::{NamedRef, TenantUser, User, UserResponse};
