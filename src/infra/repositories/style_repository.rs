use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::{style, workout};
use super::map_unique_violation;
use super::workout_repository::with_tags;
use crate::domain::{NewStyle, Style, Workout};
use crate::errors::{AppError, AppResult};

#[async_trait]
pub trait StyleRepository: Send + Sync {
    async fn add(&self, style: NewStyle) -> AppResult<Style>;

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Style>>;

    async fn get_by_name(&self, name: &str) -> AppResult<Option<Style>>;

    /// Style with every workout that belongs to it
    async fn get_with_workouts(&self, id: i32) -> AppResult<Option<(Style, Vec<Workout>)>>;

    async fn list(&self) -> AppResult<Vec<Style>>;

    async fn update(&self, style: &Style) -> AppResult<Style>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}

pub struct StyleStore<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> StyleStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

fn name_conflict(name: &str) -> impl FnOnce(&str) -> AppError + '_ {
    move |_: &str| AppError::conflict(format!("Style with name '{}' already exists.", name))
}

#[async_trait]
impl<'a, C: ConnectionTrait> StyleRepository for StyleStore<'a, C> {
    async fn add(&self, style: NewStyle) -> AppResult<Style> {
        let name = style.name.clone();
        let model = style::ActiveModel {
            name: Set(style.name),
            image_url: Set(style.image_url),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(|e| map_unique_violation(e, name_conflict(&name)))?;

        Ok(Style::from(model))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Style>> {
        let result = style::Entity::find_by_id(id).one(self.db).await?;
        Ok(result.map(Style::from))
    }

    async fn get_by_name(&self, name: &str) -> AppResult<Option<Style>> {
        let result = style::Entity::find()
            .filter(style::Column::Name.eq(name))
            .one(self.db)
            .await?;
        Ok(result.map(Style::from))
    }

    async fn get_with_workouts(&self, id: i32) -> AppResult<Option<(Style, Vec<Workout>)>> {
        let Some(model) = style::Entity::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let workouts = model
            .find_related(workout::Entity)
            .order_by_asc(workout::Column::Id)
            .all(self.db)
            .await?;
        let workouts = with_tags(self.db, workouts).await?;

        Ok(Some((Style::from(model), workouts)))
    }

    async fn list(&self) -> AppResult<Vec<Style>> {
        let models = style::Entity::find()
            .order_by_asc(style::Column::Id)
            .all(self.db)
            .await?;
        Ok(models.into_iter().map(Style::from).collect())
    }

    async fn update(&self, style: &Style) -> AppResult<Style> {
        let model = style::ActiveModel {
            id: Unchanged(style.id),
            name: Set(style.name.clone()),
            image_url: Set(style.image_url.clone()),
        }
        .update(self.db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => {
                AppError::not_found(format!("Style with id {} not found.", style.id))
            }
            other => map_unique_violation(other, name_conflict(&style.name)),
        })?;

        Ok(Style::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = style::Entity::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
