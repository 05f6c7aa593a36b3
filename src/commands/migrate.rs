//! Migrate command - Database migration management.

use sea_orm::DbErr;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

fn migration_failed(action: MigrateAction) -> impl FnOnce(DbErr) -> AppError {
    move |e| AppError::internal(format!("Migration {:?} failed: {}", action, e))
}

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let action = args.action;

    // Migrations run explicitly below, not on connect
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await.map_err(migration_failed(action))?;
            tracing::info!("Migrations applied");
        }
        MigrateAction::Down => {
            db.rollback_migration()
                .await
                .map_err(migration_failed(action))?;
            tracing::info!("Last migration rolled back");
        }
        MigrateAction::Status => {
            let status = db
                .migration_status()
                .await
                .map_err(migration_failed(action))?;
            for migration in status {
                let state = if migration.applied { "applied" } else { "pending" };
                println!("{}: {}", migration.name, state);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running migrations");
            db.fresh_migrations()
                .await
                .map_err(migration_failed(action))?;
            tracing::info!("Database recreated");
        }
    }

    Ok(())
}
