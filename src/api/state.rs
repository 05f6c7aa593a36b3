//! Application state - Dependency injection container.
//!
//! Handlers reach every use case through the interactor trait objects held
//! here; nothing is read from global state.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, UploadService};
use crate::interactors::{
    AvatarInteractor, InteractorContainer, Interactors, StyleInteractor, TagInteractor,
    UserInteractor, WorkoutInteractor,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserInteractor>,
    pub avatars: Arc<dyn AvatarInteractor>,
    pub styles: Arc<dyn StyleInteractor>,
    pub tags: Arc<dyn TagInteractor>,
    pub workouts: Arc<dyn WorkoutInteractor>,
    /// Database connection, used by the health check
    pub database: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build the full interactor graph over the given database and file store.
    pub fn from_config(
        database: Arc<Database>,
        config: Config,
        upload: Arc<dyn UploadService>,
    ) -> Self {
        let container = Interactors::from_connection(database.get_connection(), &config, upload);
        Self::from_container(&container, database, config)
    }

    /// Create state from any interactor container (e.g. a mock in tests).
    pub fn from_container(
        container: &dyn InteractorContainer,
        database: Arc<Database>,
        config: Config,
    ) -> Self {
        Self {
            users: container.users(),
            avatars: container.avatars(),
            styles: container.styles(),
            tags: container.tags(),
            workouts: container.workouts(),
            database,
            config: Arc::new(config),
        }
    }
}
