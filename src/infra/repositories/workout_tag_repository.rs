use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use super::entities::workout_tag::{self, ActiveModel, Entity as WorkoutTagEntity};
use crate::errors::AppResult;

/// Rows of the workout/tag association. Usage counters are the caller's concern.
#[async_trait]
pub trait WorkoutTagRepository: Send + Sync {
    async fn exists(&self, workout_id: i32, tag_id: i32) -> AppResult<bool>;

    /// Returns whether a row was added; an existing pair is left alone
    async fn insert(&self, workout_id: i32, tag_id: i32) -> AppResult<bool>;

    /// Returns whether a row was removed
    async fn delete(&self, workout_id: i32, tag_id: i32) -> AppResult<bool>;

    async fn tag_ids_for_workout(&self, workout_id: i32) -> AppResult<Vec<i32>>;
}

pub struct WorkoutTagStore<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> WorkoutTagStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<'a, C: ConnectionTrait> WorkoutTagRepository for WorkoutTagStore<'a, C> {
    async fn exists(&self, workout_id: i32, tag_id: i32) -> AppResult<bool> {
        let found = WorkoutTagEntity::find_by_id((workout_id, tag_id))
            .one(self.db)
            .await?;
        Ok(found.is_some())
    }

    async fn insert(&self, workout_id: i32, tag_id: i32) -> AppResult<bool> {
        let link = ActiveModel {
            workout_id: Set(workout_id),
            tag_id: Set(tag_id),
        };
        let inserted = WorkoutTagEntity::insert(link)
            .on_conflict(
                OnConflict::columns([workout_tag::Column::WorkoutId, workout_tag::Column::TagId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;
        Ok(inserted > 0)
    }

    async fn delete(&self, workout_id: i32, tag_id: i32) -> AppResult<bool> {
        let result = WorkoutTagEntity::delete_many()
            .filter(workout_tag::Column::WorkoutId.eq(workout_id))
            .filter(workout_tag::Column::TagId.eq(tag_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn tag_ids_for_workout(&self, workout_id: i32) -> AppResult<Vec<i32>> {
        let links = WorkoutTagEntity::find()
            .filter(workout_tag::Column::WorkoutId.eq(workout_id))
            .order_by_asc(workout_tag::Column::TagId)
            .all(self.db)
            .await?;
        Ok(links.into_iter().map(|l| l.tag_id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Level, NewStyle, NewTag, NewWorkout};
    use crate::infra::repositories::{StyleRepository, TagRepository, WorkoutRepository};
    use crate::infra::UnitOfWork;
    use crate::interactors::testing;

    #[tokio::test]
    async fn test_insert_reports_new_pairs_only() {
        let uow = testing::persistence().await;
        let repos = uow.repos();
        let style = repos
            .styles()
            .add(NewStyle {
                name: "Salsa".to_string(),
                image_url: "http://test/media/salsa.png".to_string(),
            })
            .await
            .unwrap();
        let workout = repos
            .workouts()
            .add(NewWorkout {
                name: "Cumbia".to_string(),
                calories: 200,
                duration: 20,
                level: Level::Beginner,
                description: "Side steps".to_string(),
                dance_video: "https://video.example.com/cumbia".to_string(),
                thumbnail_image: "http://test/media/cumbia.png".to_string(),
                author_name: "Ana".to_string(),
                views_count: 0,
                style_id: style.id,
            })
            .await
            .unwrap();
        let tag = repos
            .tags()
            .get_or_add(NewTag {
                name: "latin".to_string(),
            })
            .await
            .unwrap();

        assert!(repos.workout_tags().insert(workout.id, tag.id).await.unwrap());
        assert!(!repos.workout_tags().insert(workout.id, tag.id).await.unwrap());
        assert!(repos.workout_tags().exists(workout.id, tag.id).await.unwrap());
        assert_eq!(
            repos.workout_tags().tag_ids_for_workout(workout.id).await.unwrap(),
            vec![tag.id]
        );
    }

    #[tokio::test]
    async fn test_get_or_add_reuses_existing_tag() {
        let uow = testing::persistence().await;
        let repos = uow.repos();
        let latin = || NewTag {
            name: "latin".to_string(),
        };

        let created = repos.tags().add(latin()).await.unwrap();
        let reused = repos.tags().get_or_add(latin()).await.unwrap();

        assert_eq!(reused, created);
        assert_eq!(repos.tags().list().await.unwrap().len(), 1);
    }
}
