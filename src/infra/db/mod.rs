//! Database connection and initialization.

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr,
    Statement,
};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;

use crate::config::{Config, PoolSettings};

pub mod migrations;

pub use migrations::Migrator;

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the pool and apply pending migrations.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let database = Self::connect_without_migrations(config).await?;

        if let Err(e) = database.run_migrations().await {
            tracing::error!("Failed to run migrations: {}", e);
            return Err(e);
        }

        tracing::info!("Database connected and migrations applied");
        Ok(database)
    }

    /// Connect without running migrations (for CLI commands).
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(connect_options(config)).await?;
        Ok(Self { connection })
    }

    /// Wrap an already open connection.
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Revert the `steps` most recent migrations.
    pub async fn rollback_migrations(&self, steps: u32) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(steps)).await
    }

    /// Every known migration with its applied flag, in history order.
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        use sea_orm::{EntityTrait, QueryOrder};
        use sea_orm_migration::seaql_migrations;

        let applied: std::collections::HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect())
    }

    /// Drop everything and replay the full history.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}

fn connect_options(config: &Config) -> ConnectOptions {
    let PoolSettings {
        max_connections,
        min_connections,
        connect_timeout,
        idle_timeout,
        statement_timeout,
    } = config.pool.clone();

    let mut options = ConnectOptions::new(with_statement_timeout(
        &config.database_url,
        statement_timeout,
    ));
    options
        .max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(connect_timeout)
        .acquire_timeout(connect_timeout)
        .idle_timeout(idle_timeout)
        .sqlx_logging(false);
    options
}

/// Append a server-side `statement_timeout` to Postgres URLs so it applies to
/// every pooled connection. Other URLs and URLs that already set one are
/// returned unchanged.
fn with_statement_timeout(url: &str, timeout: Duration) -> String {
    let is_postgres = url.starts_with("postgres://") || url.starts_with("postgresql://");
    if !is_postgres || timeout.is_zero() || url.contains("statement_timeout") {
        return url.to_string();
    }

    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}options=-c%20statement_timeout%3D{}",
        url,
        separator,
        timeout.as_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_timeout_appended_to_postgres_urls() {
        let url = with_statement_timeout("postgres://u:p@db/app", Duration::from_secs(30));
        assert_eq!(url, "postgres://u:p@db/app?options=-c%20statement_timeout%3D30000");

        let url = with_statement_timeout("postgres://db/app?sslmode=require", Duration::from_millis(500));
        assert!(url.ends_with("&options=-c%20statement_timeout%3D500"));
    }

    #[test]
    fn test_statement_timeout_left_alone() {
        assert_eq!(
            with_statement_timeout("sqlite::memory:", Duration::from_secs(30)),
            "sqlite::memory:"
        );
        assert_eq!(
            with_statement_timeout("postgres://db/app", Duration::ZERO),
            "postgres://db/app"
        );
        let preset = "postgres://db/app?options=-c%20statement_timeout%3D1";
        assert_eq!(with_statement_timeout(preset, Duration::from_secs(5)), preset);
    }
}
