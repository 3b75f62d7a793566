//! Tenant Core - identity and authorization core for a multi-tenant SaaS.
//!
//! The hierarchy is platform admin → tenant superadmin → module-scoped admin
//! → user. Tenants are the isolation boundary: every tenant-scoped row is
//! reachable only through its tenant and disappears with it.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Identity entities, password hashing, principal ranking
//! - **services**: Token service, authorization rules, lifecycle managers
//! - **infra**: Database, migrations, repositories, unit of work, Redis
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Response envelopes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server (applies pending migrations first)
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create the first platform admin
//! cargo run -- bootstrap --email ops@platform.io --first-name Ops --last-name Admin
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Principal, PrincipalType};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
