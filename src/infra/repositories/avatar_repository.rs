use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ConnectionTrait, DbErr, EntityTrait, QueryOrder, Set,
};

use super::entities::avatar::{self, ActiveModel, Entity as AvatarEntity};
use crate::domain::{Avatar, NewAvatar};
use crate::errors::{AppError, AppResult};

#[async_trait]
pub trait AvatarRepository: Send + Sync {
    async fn add(&self, avatar: NewAvatar) -> AppResult<Avatar>;

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Avatar>>;

    async fn list(&self) -> AppResult<Vec<Avatar>>;

    async fn update(&self, avatar: &Avatar) -> AppResult<Avatar>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}

pub struct AvatarStore<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AvatarStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<'a, C: ConnectionTrait> AvatarRepository for AvatarStore<'a, C> {
    async fn add(&self, avatar: NewAvatar) -> AppResult<Avatar> {
        let model = ActiveModel {
            image_url: Set(avatar.image_url),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Avatar::from(model))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Avatar>> {
        let result = AvatarEntity::find_by_id(id).one(self.db).await?;
        Ok(result.map(Avatar::from))
    }

    async fn list(&self) -> AppResult<Vec<Avatar>> {
        let models = AvatarEntity::find()
            .order_by_asc(avatar::Column::Id)
            .all(self.db)
            .await?;

        Ok(models.into_iter().map(Avatar::from).collect())
    }

    async fn update(&self, avatar: &Avatar) -> AppResult<Avatar> {
        let model = ActiveModel {
            id: Unchanged(avatar.id),
            image_url: Set(avatar.image_url.clone()),
        }
        .update(self.db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => {
                AppError::not_found(format!("Avatar with id {} not found.", avatar.id))
            }
            other => AppError::Database(other),
        })?;

        Ok(Avatar::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = AvatarEntity::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
