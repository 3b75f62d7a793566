//! HTTP request handlers.

pub mod admin_handler;
pub mod platform_handler;

pub use admin_handler::{admin_auth_routes, admin_routes};
pub use platform_handler::{platform_auth_routes, platform_routes};
