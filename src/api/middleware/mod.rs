//! API middleware.

mod auth;
mod rate_limit;

pub use auth::{auth_middleware, require_platform_admin, require_super_admin_or_higher};
pub use rate_limit::rate_limit_auth_middleware;
