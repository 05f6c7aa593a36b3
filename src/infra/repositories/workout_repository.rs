//! Workout repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait,
    DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::{style, tag, workout, workout_tag};
use super::map_unique_violation;
use crate::domain::{NewWorkout, Style, Tag, Workout};
use crate::errors::{AppError, AppResult};

#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    async fn add(&self, workout: NewWorkout) -> AppResult<Workout>;

    /// Workout with its tags
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Workout>>;

    async fn get_by_name(&self, name: &str) -> AppResult<Option<Workout>>;

    /// Every workout with its tags and style, ordered by id
    async fn list(&self) -> AppResult<Vec<(Workout, Style)>>;

    /// Persist scalar fields. `views_count` is left untouched.
    async fn update(&self, workout: &Workout) -> AppResult<Workout>;

    async fn delete(&self, id: i32) -> AppResult<bool>;

    /// Atomically add one view; `None` when the workout does not exist
    async fn increment_views(&self, id: i32) -> AppResult<Option<i32>>;
}

pub struct WorkoutStore<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> WorkoutStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

fn name_conflict(name: &str) -> impl FnOnce(&str) -> AppError + '_ {
    move |_: &str| AppError::conflict(format!("Workout with name '{}' already exists.", name))
}

/// Load the tags of every given workout in one query and build domain workouts.
pub(crate) async fn with_tags<C: ConnectionTrait>(
    db: &C,
    models: Vec<workout::Model>,
) -> AppResult<Vec<Workout>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let links = workout_tag::Entity::find()
        .filter(workout_tag::Column::WorkoutId.is_in(ids))
        .order_by_asc(workout_tag::Column::TagId)
        .find_also_related(tag::Entity)
        .all(db)
        .await?;

    let mut tags_by_workout: HashMap<i32, Vec<Tag>> = HashMap::new();
    for (link, tag) in links {
        if let Some(tag) = tag {
            tags_by_workout
                .entry(link.workout_id)
                .or_default()
                .push(Tag::from(tag));
        }
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let tags = tags_by_workout.remove(&model.id).unwrap_or_default();
            model.into_workout(tags)
        })
        .collect())
}

async fn with_tags_one<C: ConnectionTrait>(
    db: &C,
    model: Option<workout::Model>,
) -> AppResult<Option<Workout>> {
    match model {
        Some(model) => Ok(with_tags(db, vec![model]).await?.pop()),
        None => Ok(None),
    }
}

#[async_trait]
impl<'a, C: ConnectionTrait> WorkoutRepository for WorkoutStore<'a, C> {
    async fn add(&self, workout: NewWorkout) -> AppResult<Workout> {
        let name = workout.name.clone();
        let active_model = workout::ActiveModel {
            name: Set(workout.name),
            calories: Set(workout.calories),
            duration: Set(workout.duration),
            level: Set(workout.level.into()),
            description: Set(workout.description),
            dance_video: Set(workout.dance_video),
            thumbnail_image: Set(workout.thumbnail_image),
            author_name: Set(workout.author_name),
            views_count: Set(workout.views_count),
            style_id: Set(workout.style_id),
            ..Default::default()
        };

        let model = active_model
            .insert(self.db)
            .await
            .map_err(|e| map_unique_violation(e, name_conflict(&name)))?;

        Ok(model.into_workout(Vec::new()))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Workout>> {
        let model = workout::Entity::find_by_id(id).one(self.db).await?;
        with_tags_one(self.db, model).await
    }

    async fn get_by_name(&self, name: &str) -> AppResult<Option<Workout>> {
        let model = workout::Entity::find()
            .filter(workout::Column::Name.eq(name))
            .one(self.db)
            .await?;
        with_tags_one(self.db, model).await
    }

    async fn list(&self) -> AppResult<Vec<(Workout, Style)>> {
        let rows = workout::Entity::find()
            .find_also_related(style::Entity)
            .order_by_asc(workout::Column::Id)
            .all(self.db)
            .await?;

        let mut models = Vec::with_capacity(rows.len());
        let mut styles = Vec::with_capacity(rows.len());
        for (model, style) in rows {
            let style = style.ok_or_else(|| {
                AppError::internal(format!("Workout {} references a missing style", model.id))
            })?;
            models.push(model);
            styles.push(Style::from(style));
        }

        let workouts = with_tags(self.db, models).await?;
        Ok(workouts.into_iter().zip(styles).collect())
    }

    async fn update(&self, workout: &Workout) -> AppResult<Workout> {
        let active_model = workout::ActiveModel {
            id: Unchanged(workout.id),
            name: Set(workout.name.clone()),
            calories: Set(workout.calories),
            duration: Set(workout.duration),
            level: Set(workout.level.into()),
            description: Set(workout.description.clone()),
            dance_video: Set(workout.dance_video.clone()),
            thumbnail_image: Set(workout.thumbnail_image.clone()),
            author_name: Set(workout.author_name.clone()),
            style_id: Set(workout.style_id),
            ..Default::default()
        };

        let model = active_model
            .update(self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => {
                    AppError::not_found(format!("Workout with id {} not found.", workout.id))
                }
                other => map_unique_violation(other, name_conflict(&workout.name)),
            })?;

        with_tags_one(self.db, Some(model))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workout with id {} not found.", workout.id)))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = workout::Entity::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn increment_views(&self, id: i32) -> AppResult<Option<i32>> {
        let result = workout::Entity::update_many()
            .col_expr(
                workout::Column::ViewsCount,
                Expr::col(workout::Column::ViewsCount).add(1),
            )
            .filter(workout::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let model = workout::Entity::find_by_id(id).one(self.db).await?;
        Ok(model.map(|m| m.views_count))
    }
}
