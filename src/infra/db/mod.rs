//! Database connection, pool settings and migration control.

use std::collections::HashSet;
use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr,
    EntityTrait, QueryOrder, Statement,
};
use sea_orm_migration::{seaql_migrations, MigratorTrait};

use crate::config::{Config, DB_CONNECT_TIMEOUT_SECS, DB_MAX_CONNECTIONS, DB_MIN_CONNECTIONS};

pub mod migrations;

pub use migrations::Migrator;

/// Whether a known migration has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationState {
    pub name: String,
    pub applied: bool,
}

/// Pooled connection shared by every request
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

fn connect_options(config: &Config) -> ConnectOptions {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(DB_MAX_CONNECTIONS)
        .min_connections(DB_MIN_CONNECTIONS)
        .connect_timeout(Duration::from_secs(DB_CONNECT_TIMEOUT_SECS))
        .acquire_timeout(Duration::from_secs(DB_CONNECT_TIMEOUT_SECS))
        .sqlx_logging(false);
    options
}

impl Database {
    /// Open the pool and bring the schema up to date.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let database = Self::connect_without_migrations(config).await?;
        database.run_migrations().await?;
        Ok(database)
    }

    /// Open the pool only; `migrate` applies changes explicitly.
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(connect_options(config)).await?;
        tracing::debug!(
            backend = ?connection.get_database_backend(),
            max_connections = DB_MAX_CONNECTIONS,
            "Database pool opened"
        );
        Ok(Self { connection })
    }

    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Handle to the same pool, for building repositories.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await?;
        tracing::info!("Schema is up to date");
        Ok(())
    }

    /// Revert the most recent migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Every known migration in order, flagged with whether it is applied.
    pub async fn migration_status(&self) -> Result<Vec<MigrationState>, DbErr> {
        // The bookkeeping table does not exist before the first `up`
        let applied: HashSet<String> = match seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await
        {
            Ok(rows) => rows.into_iter().map(|row| row.version).collect(),
            Err(e) => {
                tracing::debug!(error = %e, "No migration history yet");
                HashSet::new()
            }
        };

        Ok(Migrator::migrations()
            .iter()
            .map(|migration| {
                let name = migration.name().to_string();
                MigrationState {
                    applied: applied.contains(&name),
                    name,
                }
            })
            .collect())
    }

    /// Drop every table and apply all migrations again.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Round-trip a trivial query, used by the health check.
    pub async fn ping(&self) -> Result<(), DbErr> {
        let backend = self.connection.get_database_backend();
        self.connection
            .execute(Statement::from_string(backend, "SELECT 1"))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory() -> Database {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        Database::from_connection(SeaDatabase::connect(options).await.unwrap())
    }

    #[tokio::test]
    async fn test_status_before_and_after_up() {
        let db = memory().await;

        let pending = db.migration_status().await.unwrap();
        assert!(!pending.is_empty());
        assert!(pending.iter().all(|m| !m.applied));

        db.run_migrations().await.unwrap();

        let applied = db.migration_status().await.unwrap();
        assert!(applied.iter().all(|m| m.applied));
        assert_eq!(
            applied.iter().map(|m| &m.name).collect::<Vec<_>>(),
            pending.iter().map(|m| &m.name).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_ping_and_rollback() {
        let db = memory().await;
        db.run_migrations().await.unwrap();
        db.ping().await.unwrap();

        db.rollback_migration().await.unwrap();

        let status = db.migration_status().await.unwrap();
        assert!(status.iter().all(|m| !m.applied));
    }
}
