//! Interactor container - wires every use case to one unit of work.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    Accounts, AvatarGallery, AvatarInteractor, StyleCatalog, StyleInteractor, TagCatalog,
    TagInteractor, UserInteractor, WorkoutCatalog, WorkoutInteractor,
};
use crate::config::Config;
use crate::infra::{JwtService, Persistence, UploadService};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Access to every use case.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait InteractorContainer: Send + Sync {
    fn users(&self) -> Arc<dyn UserInteractor>;

    fn avatars(&self) -> Arc<dyn AvatarInteractor>;

    fn styles(&self) -> Arc<dyn StyleInteractor>;

    fn tags(&self) -> Arc<dyn TagInteractor>;

    fn workouts(&self) -> Arc<dyn WorkoutInteractor>;
}

/// Concrete implementation of InteractorContainer
#[derive(Clone)]
pub struct Interactors {
    users: Arc<dyn UserInteractor>,
    avatars: Arc<dyn AvatarInteractor>,
    styles: Arc<dyn StyleInteractor>,
    tags: Arc<dyn TagInteractor>,
    workouts: Arc<dyn WorkoutInteractor>,
}

impl Interactors {
    pub fn new(
        users: Arc<dyn UserInteractor>,
        avatars: Arc<dyn AvatarInteractor>,
        styles: Arc<dyn StyleInteractor>,
        tags: Arc<dyn TagInteractor>,
        workouts: Arc<dyn WorkoutInteractor>,
    ) -> Self {
        Self {
            users,
            avatars,
            styles,
            tags,
            workouts,
        }
    }

    /// Build every interactor over one connection pool and one file store.
    pub fn from_connection(
        db: DatabaseConnection,
        config: &Config,
        upload: Arc<dyn UploadService>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let jwt = JwtService::from_config(config);

        Self {
            users: Arc::new(Accounts::new(uow.clone(), jwt, config)),
            avatars: Arc::new(AvatarGallery::new(uow.clone(), upload.clone())),
            styles: Arc::new(StyleCatalog::new(uow.clone(), upload.clone())),
            tags: Arc::new(TagCatalog::new(uow.clone())),
            workouts: Arc::new(WorkoutCatalog::new(uow, upload)),
        }
    }
}

impl InteractorContainer for Interactors {
    fn users(&self) -> Arc<dyn UserInteractor> {
        self.users.clone()
    }

    fn avatars(&self) -> Arc<dyn AvatarInteractor> {
        self.avatars.clone()
    }

    fn styles(&self) -> Arc<dyn StyleInteractor> {
        self.styles.clone()
    }

    fn tags(&self) -> Arc<dyn TagInteractor> {
        self.tags.clone()
    }

    fn workouts(&self) -> Arc<dyn WorkoutInteractor> {
        self.workouts.clone()
    }
}
