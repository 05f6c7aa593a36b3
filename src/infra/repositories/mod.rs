//! Repository layer - Data access abstraction
//!
//! One trait per entity family, one SeaORM store implementing it. Stores
//! borrow any `ConnectionTrait`, so the same code runs against the pool or
//! inside a unit-of-work transaction.

mod avatar_repository;
mod client_repository;
pub(crate) mod entities;
mod staff_repository;
mod style_repository;
mod tag_repository;
mod user_repository;
mod workout_repository;
mod workout_tag_repository;

use sea_orm::{ConnectionTrait, DbErr, SqlErr};

use crate::errors::AppError;

pub use avatar_repository::{AvatarRepository, AvatarStore};
pub use client_repository::{ClientRepository, ClientStore};
pub use staff_repository::{StaffRepository, StaffStore};
pub use style_repository::{StyleRepository, StyleStore};
pub use tag_repository::{TagFilter, TagRepository, TagStore};
pub use user_repository::{UserRepository, UserStore};
pub use workout_repository::{WorkoutRepository, WorkoutStore};
pub use workout_tag_repository::{WorkoutTagRepository, WorkoutTagStore};

/// Translate a unique-constraint violation with `on_conflict`; any other
/// failure stays a database error. The closure receives the driver message.
pub(crate) fn map_unique_violation(
    err: DbErr,
    on_conflict: impl FnOnce(&str) -> AppError,
) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => on_conflict(&detail),
        _ => AppError::Database(err),
    }
}

/// Access to every repository over one connection.
pub struct Repositories<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> Repositories<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub fn users(&self) -> UserStore<'a, C> {
        UserStore::new(self.db)
    }

    pub fn clients(&self) -> ClientStore<'a, C> {
        ClientStore::new(self.db)
    }

    pub fn staff(&self) -> StaffStore<'a, C> {
        StaffStore::new(self.db)
    }

    pub fn avatars(&self) -> AvatarStore<'a, C> {
        AvatarStore::new(self.db)
    }

    pub fn styles(&self) -> StyleStore<'a, C> {
        StyleStore::new(self.db)
    }

    pub fn tags(&self) -> TagStore<'a, C> {
        TagStore::new(self.db)
    }

    pub fn workouts(&self) -> WorkoutStore<'a, C> {
        WorkoutStore::new(self.db)
    }

    pub fn workout_tags(&self) -> WorkoutTagStore<'a, C> {
        WorkoutTagStore::new(self.db)
    }
}
