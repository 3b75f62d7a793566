//! Bootstrap command - creates a platform admin with no creator.

use crate::cli::args::BootstrapArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::services::{CreatePlatformAdmin, ServiceContainer, Services};

/// Execute the bootstrap command
pub async fn execute(args: BootstrapArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let services = Services::from_connection(db.get_connection(), &config);
    let admin = services
        .platform_admins()
        .create_platform_admin(CreatePlatformAdmin {
            email: args.email,
            first_name: args.first_name,
            last_name: args.last_name,
            password: args.password,
            created_by: None,
        })
        .await?;

    println!("Platform admin {} created ({})", admin.email, admin.id);
    Ok(())
}
