//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models. The
//! relation attributes carry the referential rules (`on_delete`) so a schema
//! derived from them enforces the same cascades as the migrations.

pub mod admin;
pub mod admin_assignment;
pub mod admin_onboarding_request;
pub mod admin_permission;
pub mod audit_log;
pub mod building;
pub mod floor;
pub mod invoice;
pub mod notification;
pub mod organization;
pub mod plan;
pub mod platform_admin;
pub mod role;
pub mod subscription;
pub mod tenant;
pub mod tenant_domain;
pub mod usage_event;
pub mod user;
pub mod webhook;

pub use admin::{ActiveModel as AdminActiveModel, Entity as AdminEntity, Model as AdminModel};
pub use platform_admin::{
    ActiveModel as PlatformAdminActiveModel, Entity as PlatformAdminEntity,
    Model as PlatformAdminModel,
};
pub use tenant::{ActiveModel as TenantActiveModel, Entity as TenantEntity, Model as TenantModel};
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
