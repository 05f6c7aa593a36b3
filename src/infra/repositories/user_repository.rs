//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::map_unique_violation;
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

/// User repository trait for dependency injection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; a taken email is reported as `UserAlreadyExists`
    async fn add(&self, user: NewUser) -> AppResult<User>;

    async fn get_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Exact match on the stored (normalized) email
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn list(&self) -> AppResult<Vec<User>>;

    async fn update(&self, user: &User) -> AppResult<User>;

    /// Returns whether a row was removed
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

/// SeaORM-backed user repository over a pool or a transaction
pub struct UserStore<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

fn user_conflict(email: &str) -> impl FnOnce(&str) -> AppError + '_ {
    move |detail: &str| {
        if detail.contains("email") {
            AppError::UserAlreadyExists(format!("User with email {} already exists.", email))
        } else {
            AppError::conflict("Username is already taken.")
        }
    }
}

#[async_trait]
impl<'a, C: ConnectionTrait> UserRepository for UserStore<'a, C> {
    async fn add(&self, user: NewUser) -> AppResult<User> {
        let email = user.email.into_string();
        let active_model = ActiveModel {
            email: Set(email.clone()),
            username: Set(user.username),
            password: Set(user.password.into_string()),
            avatar_id: Set(user.avatar_id),
            ..Default::default()
        };

        let model = active_model
            .insert(self.db)
            .await
            .map_err(|e| map_unique_violation(e, user_conflict(&email)))?;

        Ok(User::from(model))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(self.db).await?;
        Ok(result.map(User::from))
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let active_model = ActiveModel {
            id: Unchanged(user.id),
            email: Set(user.email.as_str().to_string()),
            username: Set(user.username.clone()),
            password: Set(user.password.as_str().to_string()),
            avatar_id: Set(user.avatar_id),
        };

        let model = active_model
            .update(self.db)
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotUpdated => AppError::UserNotFound,
                other => map_unique_violation(other, user_conflict(user.email.as_str())),
            })?;

        Ok(User::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = UserEntity::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
