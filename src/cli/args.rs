//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Tenant Core - identity and authorization core for a multi-tenant SaaS
#[derive(Parser, Debug)]
#[command(name = "tenant-core")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create a platform admin without an authenticated creator
    Bootstrap(BootstrapArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "SERVER_PORT")]
    pub port: u16,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Apply pending migrations; already applied steps are skipped
    Up,
    /// Revert the most recent migrations (data copied into `admins` is not restored)
    Down {
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// List every migration as applied or pending
    Status,
    /// Drop every table, all tenants included, and replay the history
    Fresh {
        /// Required, the command is destructive
        #[arg(long)]
        force: bool,
    },
}

/// Arguments for the bootstrap command
#[derive(Parser, Debug)]
pub struct BootstrapArgs {
    #[arg(long, env = "PLATFORM_ADMIN_EMAIL")]
    pub email: String,

    #[arg(long, env = "PLATFORM_ADMIN_FIRST_NAME")]
    pub first_name: String,

    #[arg(long, env = "PLATFORM_ADMIN_LAST_NAME")]
    pub last_name: String,

    /// Read from the environment so it stays out of shell history
    #[arg(long, env = "PLATFORM_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}
