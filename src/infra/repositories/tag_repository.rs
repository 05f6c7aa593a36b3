//! Tag repository implementation.
//!
//! Usage counters are only changed with single conditional UPDATE
//! statements, so concurrent attach/detach calls cannot lose updates.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr, OnConflict},
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Select, Set,
};

use super::entities::{tag, workout};
use super::map_unique_violation;
use super::workout_repository::with_tags;
use crate::domain::{NewTag, Tag, Workout};
use crate::errors::{AppError, AppResult};

/// Constraints for tag searches. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    /// Case-insensitive substring of the tag name
    pub name: Option<String>,
    pub min_usages: Option<i32>,
    pub max_usages: Option<i32>,
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn add(&self, tag: NewTag) -> AppResult<Tag>;

    /// The tag named `tag.name`, created with no usages when missing.
    /// A concurrent creation of the same name is reused, not an error.
    async fn get_or_add(&self, tag: NewTag) -> AppResult<Tag>;

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Tag>>;

    /// Exact name match
    async fn get_by_name(&self, name: &str) -> AppResult<Option<Tag>>;

    async fn get_with_workouts(&self, id: i32) -> AppResult<Option<(Tag, Vec<Workout>)>>;

    async fn list(&self) -> AppResult<Vec<Tag>>;

    /// Page of tags ordered by id plus the total tag count
    async fn list_paginated(&self, page: u64, per_page: u64) -> AppResult<(Vec<Tag>, u64)>;

    /// Page of tags ordered by usages, most used first, plus the total tag count
    async fn list_paginated_popular(&self, page: u64, per_page: u64)
        -> AppResult<(Vec<Tag>, u64)>;

    async fn search(&self, filter: &TagFilter) -> AppResult<Vec<Tag>>;

    async fn search_with_workouts(&self, filter: &TagFilter)
        -> AppResult<Vec<(Tag, Vec<Workout>)>>;

    /// Rename a tag; the usage counter is not written
    async fn update(&self, tag: &Tag) -> AppResult<Tag>;

    async fn delete(&self, id: i32) -> AppResult<bool>;

    /// Add one usage and return the new count
    async fn increment_usages(&self, id: i32) -> AppResult<i32>;

    /// Remove one usage, never going below zero, and return the new count
    async fn decrement_usages(&self, id: i32) -> AppResult<i32>;
}

pub struct TagStore<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TagStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    async fn usages_of(&self, id: i32) -> AppResult<i32> {
        tag::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .map(|m| m.usages)
            .ok_or_else(|| tag_not_found(id))
    }

    async fn paginate(&self, query: Select<tag::Entity>, page: u64, per_page: u64)
        -> AppResult<(Vec<Tag>, u64)> {
        let paginator = query.paginate(self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((models.into_iter().map(Tag::from).collect(), total))
    }

    async fn workouts_for(&self, model: &tag::Model) -> AppResult<Vec<Workout>> {
        let workouts = model
            .find_related(workout::Entity)
            .order_by_asc(workout::Column::Id)
            .all(self.db)
            .await?;
        with_tags(self.db, workouts).await
    }
}

fn tag_not_found(id: i32) -> AppError {
    AppError::not_found(format!("Tag with id {} not found.", id))
}

fn name_conflict(name: &str) -> impl FnOnce(&str) -> AppError + '_ {
    move |_: &str| AppError::conflict(format!("Tag with name '{}' already exists.", name))
}

fn filter_condition(filter: &TagFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(name) = filter.name.as_deref() {
        let escaped = name
            .to_lowercase()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        condition = condition.add(
            Expr::expr(Func::lower(Expr::col(tag::Column::Name)))
                .like(LikeExpr::new(format!("%{}%", escaped)).escape('\\')),
        );
    }
    if let Some(min) = filter.min_usages {
        condition = condition.add(tag::Column::Usages.gte(min));
    }
    if let Some(max) = filter.max_usages {
        condition = condition.add(tag::Column::Usages.lte(max));
    }
    condition
}

#[async_trait]
impl<'a, C: ConnectionTrait> TagRepository for TagStore<'a, C> {
    async fn add(&self, tag: NewTag) -> AppResult<Tag> {
        let name = tag.name.clone();
        let model = tag::ActiveModel {
            name: Set(tag.name),
            usages: Set(0),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(|e| map_unique_violation(e, name_conflict(&name)))?;

        Ok(Tag::from(model))
    }

    async fn get_or_add(&self, tag: NewTag) -> AppResult<Tag> {
        if let Some(existing) = self.get_by_name(&tag.name).await? {
            return Ok(existing);
        }

        let name = tag.name.clone();
        let model = tag::ActiveModel {
            name: Set(tag.name),
            usages: Set(0),
            ..Default::default()
        };
        tag::Entity::insert(model)
            .on_conflict(
                OnConflict::column(tag::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        self.get_by_name(&name)
            .await?
            .ok_or_else(|| AppError::internal(format!("Tag '{}' vanished after insert", name)))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Tag>> {
        let result = tag::Entity::find_by_id(id).one(self.db).await?;
        Ok(result.map(Tag::from))
    }

    async fn get_by_name(&self, name: &str) -> AppResult<Option<Tag>> {
        let result = tag::Entity::find()
            .filter(tag::Column::Name.eq(name))
            .one(self.db)
            .await?;
        Ok(result.map(Tag::from))
    }

    async fn get_with_workouts(&self, id: i32) -> AppResult<Option<(Tag, Vec<Workout>)>> {
        let Some(model) = tag::Entity::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };
        let workouts = self.workouts_for(&model).await?;
        Ok(Some((Tag::from(model), workouts)))
    }

    async fn list(&self) -> AppResult<Vec<Tag>> {
        let models = tag::Entity::find()
            .order_by_asc(tag::Column::Id)
            .all(self.db)
            .await?;
        Ok(models.into_iter().map(Tag::from).collect())
    }

    async fn list_paginated(&self, page: u64, per_page: u64) -> AppResult<(Vec<Tag>, u64)> {
        let query = tag::Entity::find().order_by_asc(tag::Column::Id);
        self.paginate(query, page, per_page).await
    }

    async fn list_paginated_popular(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<Tag>, u64)> {
        let query = tag::Entity::find()
            .order_by_desc(tag::Column::Usages)
            .order_by_asc(tag::Column::Id);
        self.paginate(query, page, per_page).await
    }

    async fn search(&self, filter: &TagFilter) -> AppResult<Vec<Tag>> {
        let models = tag::Entity::find()
            .filter(filter_condition(filter))
            .order_by_asc(tag::Column::Id)
            .all(self.db)
            .await?;
        Ok(models.into_iter().map(Tag::from).collect())
    }

    async fn search_with_workouts(
        &self,
        filter: &TagFilter,
    ) -> AppResult<Vec<(Tag, Vec<Workout>)>> {
        let models = tag::Entity::find()
            .filter(filter_condition(filter))
            .order_by_asc(tag::Column::Id)
            .all(self.db)
            .await?;

        let mut result = Vec::with_capacity(models.len());
        for model in models {
            let workouts = self.workouts_for(&model).await?;
            result.push((Tag::from(model), workouts));
        }
        Ok(result)
    }

    async fn update(&self, tag: &Tag) -> AppResult<Tag> {
        let model = tag::ActiveModel {
            id: Unchanged(tag.id),
            name: Set(tag.name.clone()),
            ..Default::default()
        }
        .update(self.db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => tag_not_found(tag.id),
            other => map_unique_violation(other, name_conflict(&tag.name)),
        })?;

        Ok(Tag::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = tag::Entity::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn increment_usages(&self, id: i32) -> AppResult<i32> {
        tag::Entity::update_many()
            .col_expr(tag::Column::Usages, Expr::col(tag::Column::Usages).add(1))
            .filter(tag::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        self.usages_of(id).await
    }

    async fn decrement_usages(&self, id: i32) -> AppResult<i32> {
        tag::Entity::update_many()
            .col_expr(tag::Column::Usages, Expr::col(tag::Column::Usages).sub(1))
            .filter(tag::Column::Id.eq(id))
            .filter(tag::Column::Usages.gt(0))
            .exec(self.db)
            .await?;

        self.usages_of(id).await
    }
}
