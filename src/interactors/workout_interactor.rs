//! Workouts and their tag associations.
//!
//! A tag's `usages` equals the number of association rows pointing at it:
//! a row is only inserted when absent and every removed row decrements once.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::ConnectionTrait;

use super::{compensate, reclaim, ImageFile};
use crate::config::WORKOUT_IMAGE_DIR;
use crate::domain::{
    Style, TagService, Workout, WorkoutChanges, WorkoutDraft, WorkoutService,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::{
    Repositories, StyleRepository, TagRepository, WorkoutRepository, WorkoutTagRepository,
};
use crate::infra::{UnitOfWork, UploadService};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone)]
pub struct CreateWorkoutInput {
    pub draft: WorkoutDraft,
    /// Tag names; missing tags are created
    pub tags: Vec<String>,
    pub thumbnail: ImageFile,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateWorkoutInput {
    /// `thumbnail_image` is ignored; it is set from `thumbnail`
    pub changes: WorkoutChanges,
    pub thumbnail: Option<ImageFile>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait WorkoutInteractor: Send + Sync {
    async fn create(&self, input: CreateWorkoutInput) -> AppResult<Workout>;

    /// Every workout with its style
    async fn list(&self) -> AppResult<Vec<(Workout, Style)>>;

    async fn get(&self, id: i32) -> AppResult<Workout>;

    async fn update(&self, id: i32, input: UpdateWorkoutInput) -> AppResult<Workout>;

    /// Attach tags by name. Already attached tags are left alone.
    async fn add_tags(&self, id: i32, tags: Vec<String>) -> AppResult<Workout>;

    async fn remove_tag(&self, workout_id: i32, tag_id: i32) -> AppResult<()>;

    /// Count one view and return the new total.
    async fn increment_views(&self, id: i32) -> AppResult<i32>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct WorkoutCatalog<U: UnitOfWork> {
    uow: Arc<U>,
    upload: Arc<dyn UploadService>,
    workouts: WorkoutService,
    tags: TagService,
}

impl<U: UnitOfWork> WorkoutCatalog<U> {
    pub fn new(uow: Arc<U>, upload: Arc<dyn UploadService>) -> Self {
        Self {
            uow,
            upload,
            workouts: WorkoutService,
            tags: TagService,
        }
    }

    async fn find(&self, id: i32) -> AppResult<Workout> {
        self.uow
            .repos()
            .workouts()
            .get_by_id(id)
            .await?
            .ok_or_not_found(|| workout_not_found(id))
    }

    async fn ensure_name_free(&self, name: &str, except_id: Option<i32>) -> AppResult<()> {
        match self.uow.repos().workouts().get_by_name(name).await? {
            Some(other) if Some(other.id) != except_id => Err(AppError::conflict(format!(
                "Workout with name '{}' already exists.",
                name
            ))),
            _ => Ok(()),
        }
    }

    async fn ensure_style_exists(&self, style_id: i32) -> AppResult<()> {
        self.uow
            .repos()
            .styles()
            .get_by_id(style_id)
            .await?
            .ok_or_not_found(|| format!("Style with id {} not found", style_id))?;
        Ok(())
    }
}

fn workout_not_found(id: i32) -> String {
    format!("Workout with id {} not found", id)
}

fn normalized_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Workout name must not be empty"));
    }
    Ok(name.to_string())
}

/// Find or create each named tag and attach it to the workout.
///
/// Attaching a tag that is already attached changes nothing, so the usage
/// counter moves at most once per workout and tag.
pub(super) async fn attach_tags<C: ConnectionTrait>(
    repos: &Repositories<'_, C>,
    tag_service: TagService,
    workout_id: i32,
    names: &[String],
) -> AppResult<()> {
    for name in names {
        let new_tag = tag_service.create_tag_entity(name);
        if new_tag.name.is_empty() {
            continue;
        }

        let tag = repos.tags().get_or_add(new_tag).await?;
        if repos.workout_tags().insert(workout_id, tag.id).await? {
            repos.tags().increment_usages(tag.id).await?;
        }
    }
    Ok(())
}

/// Detach every tag from the workout, releasing one usage per removed row.
pub(super) async fn release_tags<C: ConnectionTrait>(
    repos: &Repositories<'_, C>,
    workout_id: i32,
) -> AppResult<()> {
    for tag_id in repos.workout_tags().tag_ids_for_workout(workout_id).await? {
        if repos.workout_tags().delete(workout_id, tag_id).await? {
            repos.tags().decrement_usages(tag_id).await?;
        }
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> WorkoutInteractor for WorkoutCatalog<U> {
    async fn create(&self, input: CreateWorkoutInput) -> AppResult<Workout> {
        let CreateWorkoutInput {
            mut draft,
            tags,
            thumbnail,
        } = input;
        draft.name = normalized_name(&draft.name)?;
        self.ensure_name_free(&draft.name, None).await?;
        self.ensure_style_exists(draft.style_id).await?;

        let uploaded = self
            .upload
            .upload_file(thumbnail.into_upload(WORKOUT_IMAGE_DIR))
            .await?;
        let new_workout = self
            .workouts
            .create_workout_entity(draft, uploaded.url.clone());
        let tag_service = self.tags;

        let result = self
            .uow
            .transaction(move |tx| async move {
                let repos = tx.repos();
                let workout = repos.workouts().add(new_workout).await?;
                attach_tags(&repos, tag_service, workout.id, &tags).await?;

                repos
                    .workouts()
                    .get_by_id(workout.id)
                    .await?
                    .ok_or_not_found(|| workout_not_found(workout.id))
            })
            .await;
        let workout = compensate(self.upload.as_ref(), Some(&uploaded.url), result).await?;

        tracing::info!(
            workout_id = workout.id,
            name = %workout.name,
            tags = workout.tags.len(),
            "Workout created"
        );
        Ok(workout)
    }

    async fn list(&self) -> AppResult<Vec<(Workout, Style)>> {
        self.uow.repos().workouts().list().await
    }

    async fn get(&self, id: i32) -> AppResult<Workout> {
        self.find(id).await
    }

    async fn update(&self, id: i32, input: UpdateWorkoutInput) -> AppResult<Workout> {
        let existing = self.find(id).await?;
        let UpdateWorkoutInput {
            mut changes,
            thumbnail,
        } = input;

        if let Some(name) = changes.name.take() {
            let name = normalized_name(&name)?;
            self.ensure_name_free(&name, Some(id)).await?;
            changes.name = Some(name);
        }
        if let Some(style_id) = changes.style_id {
            self.ensure_style_exists(style_id).await?;
        }

        let new_url = match thumbnail {
            Some(image) => Some(
                self.upload
                    .upload_file(image.into_upload(WORKOUT_IMAGE_DIR))
                    .await?
                    .url,
            ),
            None => None,
        };
        changes.thumbnail_image = new_url.clone();
        let changed = self.workouts.update_workout(&existing, changes);

        let result = self
            .uow
            .transaction(move |tx| async move { tx.repos().workouts().update(&changed).await })
            .await;
        let workout = compensate(self.upload.as_ref(), new_url.as_deref(), result).await?;

        if new_url.is_some() {
            reclaim(self.upload.as_ref(), &existing.thumbnail_image).await;
        }
        tracing::info!(workout_id = id, "Workout updated");
        Ok(workout)
    }

    async fn add_tags(&self, id: i32, tags: Vec<String>) -> AppResult<Workout> {
        self.find(id).await?;
        let tag_service = self.tags;

        let workout = self
            .uow
            .transaction(move |tx| async move {
                let repos = tx.repos();
                attach_tags(&repos, tag_service, id, &tags).await?;
                repos
                    .workouts()
                    .get_by_id(id)
                    .await?
                    .ok_or_not_found(|| workout_not_found(id))
            })
            .await?;

        tracing::debug!(workout_id = id, tags = workout.tags.len(), "Tags added");
        Ok(workout)
    }

    async fn remove_tag(&self, workout_id: i32, tag_id: i32) -> AppResult<()> {
        self.find(workout_id).await?;
        self.uow
            .repos()
            .tags()
            .get_by_id(tag_id)
            .await?
            .ok_or_not_found(|| format!("Tag with id {} not found", tag_id))?;

        self.uow
            .transaction(move |tx| async move {
                let repos = tx.repos();
                if !repos.workout_tags().delete(workout_id, tag_id).await? {
                    return Err(AppError::bad_request(format!(
                        "Tag {} is not attached to workout {}",
                        tag_id, workout_id
                    )));
                }
                repos.tags().decrement_usages(tag_id).await?;
                Ok(())
            })
            .await?;

        tracing::debug!(workout_id, tag_id, "Tag removed");
        Ok(())
    }

    async fn increment_views(&self, id: i32) -> AppResult<i32> {
        self.uow
            .transaction(move |tx| async move { tx.repos().workouts().increment_views(id).await })
            .await?
            .ok_or_not_found(|| workout_not_found(id))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let existing = self.find(id).await?;

        self.uow
            .transaction(move |tx| async move {
                let repos = tx.repos();
                release_tags(&repos, id).await?;
                repos.workouts().delete(id).await?;
                Ok(())
            })
            .await?;

        reclaim(self.upload.as_ref(), &existing.thumbnail_image).await;
        tracing::info!(workout_id = id, "Workout deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Level, NewStyle, UploadedFile};
    use crate::infra::{MockUploadService, Persistence};
    use crate::interactors::testing;

    struct Fixture {
        catalog: WorkoutCatalog<Persistence>,
        uow: Arc<Persistence>,
        style_id: i32,
    }

    async fn fixture(upload: MockUploadService) -> Fixture {
        let uow = testing::persistence().await;
        let style = uow
            .repos()
            .styles()
            .add(NewStyle {
                name: "Jazz".to_string(),
                image_url: "http://test/media/styles/images/jazz.png".to_string(),
            })
            .await
            .unwrap();

        Fixture {
            catalog: WorkoutCatalog::new(uow.clone(), Arc::new(upload)),
            uow,
            style_id: style.id,
        }
    }

    fn input(name: &str, style_id: i32, tags: &[&str]) -> CreateWorkoutInput {
        CreateWorkoutInput {
            draft: WorkoutDraft {
                name: name.to_string(),
                calories: 300,
                duration: 45,
                level: Level::Beginner,
                description: "Warm up, then groove".to_string(),
                dance_video: "https://video.example.com/1".to_string(),
                author_name: "Mia".to_string(),
                style_id,
            },
            tags: tags.iter().map(|t| t.to_string()).collect(),
            thumbnail: ImageFile::new(vec![7, 7, 7], format!("{}.png", name)),
        }
    }

    async fn usages(uow: &Persistence, name: &str) -> i32 {
        uow.repos()
            .tags()
            .get_by_name(name)
            .await
            .unwrap()
            .map(|t| t.usages)
            .unwrap_or(-1)
    }

    #[tokio::test]
    async fn test_create_with_tags() {
        let f = fixture(testing::accepting_uploads()).await;

        let workout = f
            .catalog
            .create(input("Groove", f.style_id, &["cardio", "hiit", "cardio"]))
            .await
            .unwrap();

        assert_eq!(workout.views_count, 0);
        assert_eq!(
            workout.thumbnail_image,
            "http://test/media/workouts/images/Groove.png"
        );
        let mut names: Vec<_> = workout.tags.iter().map(|t| t.name.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["cardio", "hiit"]);
        assert_eq!(usages(&f.uow, "cardio").await, 1);
    }

    #[tokio::test]
    async fn test_add_tags_is_idempotent() {
        let f = fixture(testing::accepting_uploads()).await;
        let workout = f
            .catalog
            .create(input("Groove", f.style_id, &["cardio"]))
            .await
            .unwrap();

        f.catalog
            .add_tags(workout.id, vec!["cardio".to_string(), "core".to_string()])
            .await
            .unwrap();
        let again = f
            .catalog
            .add_tags(workout.id, vec!["core".to_string()])
            .await
            .unwrap();

        assert_eq!(again.tags.len(), 2);
        assert_eq!(usages(&f.uow, "cardio").await, 1);
        assert_eq!(usages(&f.uow, "core").await, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_style_before_upload() {
        let mut upload = MockUploadService::new();
        upload.expect_upload_file().never();
        let f = fixture(upload).await;

        let result = f.catalog.create(input("Lonely", 9999, &[])).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_taken_name() {
        let f = fixture(testing::accepting_uploads()).await;
        f.catalog
            .create(input("Groove", f.style_id, &[]))
            .await
            .unwrap();

        let result = f.catalog.create(input(" Groove ", f.style_id, &[])).await;
        assert!(matches!(result, Err(AppError::DataConflict(_))));
    }

    #[tokio::test]
    async fn test_remove_tag_paths() {
        let f = fixture(testing::accepting_uploads()).await;
        let workout = f
            .catalog
            .create(input("Groove", f.style_id, &["cardio"]))
            .await
            .unwrap();
        let cardio = workout.tags[0].clone();

        f.catalog.remove_tag(workout.id, cardio.id).await.unwrap();
        assert_eq!(usages(&f.uow, "cardio").await, 0);

        let detached = f.catalog.remove_tag(workout.id, cardio.id).await;
        assert!(matches!(detached, Err(AppError::BadRequest(_))));
        assert_eq!(usages(&f.uow, "cardio").await, 0);

        let no_tag = f.catalog.remove_tag(workout.id, 9999).await;
        assert!(matches!(no_tag, Err(AppError::NotFound(_))));

        let no_workout = f.catalog.remove_tag(9999, cardio.id).await;
        assert!(matches!(no_workout, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_merges_and_replaces_thumbnail() {
        let mut upload = MockUploadService::new();
        upload.expect_upload_file().times(2).returning(|file| {
            Ok(UploadedFile {
                url: format!("http://test/media/{}", file.filename),
            })
        });
        upload
            .expect_delete_file()
            .withf(|url| url == "http://test/media/Groove.png")
            .times(1)
            .returning(|_| Ok(true));
        let f = fixture(upload).await;
        let created = f
            .catalog
            .create(input("Groove", f.style_id, &["cardio"]))
            .await
            .unwrap();
        f.catalog.increment_views(created.id).await.unwrap();

        let updated = f
            .catalog
            .update(
                created.id,
                UpdateWorkoutInput {
                    changes: WorkoutChanges {
                        calories: Some(500),
                        level: Some("IMPOSSIBLE".to_string()),
                        ..Default::default()
                    },
                    thumbnail: Some(ImageFile::new(vec![1], "fresh.png")),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Groove");
        assert_eq!(updated.calories, 500);
        assert_eq!(updated.level, Level::Impossible);
        assert_eq!(updated.views_count, 1);
        assert_eq!(updated.thumbnail_image, "http://test/media/fresh.png");
        assert_eq!(updated.tags.len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_level_when_unparseable() {
        let f = fixture(testing::accepting_uploads()).await;
        let created = f
            .catalog
            .create(input("Groove", f.style_id, &[]))
            .await
            .unwrap();

        let updated = f
            .catalog
            .update(
                created.id,
                UpdateWorkoutInput {
                    changes: WorkoutChanges {
                        level: Some("legendary".to_string()),
                        ..Default::default()
                    },
                    thumbnail: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.level, Level::Beginner);
        assert_eq!(updated.thumbnail_image, created.thumbnail_image);
    }

    #[tokio::test]
    async fn test_increment_views() {
        let f = fixture(testing::accepting_uploads()).await;
        let workout = f
            .catalog
            .create(input("Groove", f.style_id, &[]))
            .await
            .unwrap();

        assert_eq!(f.catalog.increment_views(workout.id).await.unwrap(), 1);
        assert_eq!(f.catalog.increment_views(workout.id).await.unwrap(), 2);
        assert!(matches!(
            f.catalog.increment_views(9999).await,
            Err(AppError::NotFound(_))
        ));
    }
}
