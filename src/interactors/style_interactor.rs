//! Dance styles. Each workout belongs to exactly one style.

use std::sync::Arc;

use async_trait::async_trait;

use super::workout_interactor::release_tags;
use super::{compensate, reclaim, ImageFile};
use crate::config::STYLE_IMAGE_DIR;
use crate::domain::{Style, StyleService, Workout};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::StyleRepository;
use crate::infra::{UnitOfWork, UploadService};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone)]
pub struct CreateStyleInput {
    pub name: String,
    pub image: ImageFile,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateStyleInput {
    pub name: Option<String>,
    pub image: Option<ImageFile>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StyleInteractor: Send + Sync {
    /// Create a style. Names are unique.
    async fn create(&self, input: CreateStyleInput) -> AppResult<Style>;

    async fn list(&self) -> AppResult<Vec<Style>>;

    async fn get(&self, id: i32) -> AppResult<Style>;

    /// Style together with its workouts
    async fn detail(&self, id: i32) -> AppResult<(Style, Vec<Workout>)>;

    async fn update(&self, id: i32, input: UpdateStyleInput) -> AppResult<Style>;

    /// Delete a style and, through the foreign key, its workouts.
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct StyleCatalog<U: UnitOfWork> {
    uow: Arc<U>,
    upload: Arc<dyn UploadService>,
    styles: StyleService,
}

impl<U: UnitOfWork> StyleCatalog<U> {
    pub fn new(uow: Arc<U>, upload: Arc<dyn UploadService>) -> Self {
        Self {
            uow,
            upload,
            styles: StyleService,
        }
    }

    async fn find(&self, id: i32) -> AppResult<Style> {
        self.uow
            .repos()
            .styles()
            .get_by_id(id)
            .await?
            .ok_or_not_found(|| format!("Style with id {} not found", id))
    }

    /// Fail when `name` belongs to a style other than `except_id`.
    async fn ensure_name_free(&self, name: &str, except_id: Option<i32>) -> AppResult<()> {
        match self.uow.repos().styles().get_by_name(name).await? {
            Some(other) if Some(other.id) != except_id => Err(AppError::conflict(format!(
                "Style with name '{}' already exists.",
                name
            ))),
            _ => Ok(()),
        }
    }
}

fn normalized_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Style name must not be empty"));
    }
    Ok(name.to_string())
}

#[async_trait]
impl<U: UnitOfWork> StyleInteractor for StyleCatalog<U> {
    async fn create(&self, input: CreateStyleInput) -> AppResult<Style> {
        let name = normalized_name(&input.name)?;
        self.ensure_name_free(&name, None).await?;

        let uploaded = self
            .upload
            .upload_file(input.image.into_upload(STYLE_IMAGE_DIR))
            .await?;
        let new_style = self.styles.create_style(name, uploaded.url.clone());

        let result = self
            .uow
            .transaction(move |tx| async move { tx.repos().styles().add(new_style).await })
            .await;
        let style = compensate(self.upload.as_ref(), Some(&uploaded.url), result).await?;

        tracing::info!(style_id = style.id, name = %style.name, "Style created");
        Ok(style)
    }

    async fn list(&self) -> AppResult<Vec<Style>> {
        self.uow.repos().styles().list().await
    }

    async fn get(&self, id: i32) -> AppResult<Style> {
        self.find(id).await
    }

    async fn detail(&self, id: i32) -> AppResult<(Style, Vec<Workout>)> {
        self.uow
            .repos()
            .styles()
            .get_with_workouts(id)
            .await?
            .ok_or_not_found(|| format!("Style with id {} not found", id))
    }

    async fn update(&self, id: i32, input: UpdateStyleInput) -> AppResult<Style> {
        let existing = self.find(id).await?;
        let name = input.name.as_deref().map(normalized_name).transpose()?;
        if let Some(name) = &name {
            self.ensure_name_free(name, Some(id)).await?;
        }

        let uploaded = match input.image {
            Some(image) => Some(
                self.upload
                    .upload_file(image.into_upload(STYLE_IMAGE_DIR))
                    .await?,
            ),
            None => None,
        };
        let new_url = uploaded.as_ref().map(|file| file.url.clone());
        let changed = self.styles.update_style(&existing, name, new_url.clone());

        let result = self
            .uow
            .transaction(move |tx| async move { tx.repos().styles().update(&changed).await })
            .await;
        let style = compensate(self.upload.as_ref(), new_url.as_deref(), result).await?;

        if new_url.is_some() {
            reclaim(self.upload.as_ref(), &existing.image_url).await;
        }
        tracing::info!(style_id = id, "Style updated");
        Ok(style)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let style = self.find(id).await?;

        // Workouts are read inside the transaction so none is cascaded
        // away with its tags still counted.
        let workouts = self
            .uow
            .transaction(move |tx| async move {
                let repos = tx.repos();
                let (_, workouts) = repos
                    .styles()
                    .get_with_workouts(id)
                    .await?
                    .ok_or_not_found(|| format!("Style with id {} not found", id))?;
                for workout in &workouts {
                    release_tags(&repos, workout.id).await?;
                }
                repos.styles().delete(id).await?;
                Ok(workouts)
            })
            .await?;

        reclaim(self.upload.as_ref(), &style.image_url).await;
        for workout in &workouts {
            reclaim(self.upload.as_ref(), &workout.thumbnail_image).await;
        }
        tracing::info!(style_id = id, workouts = workouts.len(), "Style deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UploadedFile;
    use crate::infra::{MockUploadService, Persistence};
    use crate::interactors::testing;

    fn hip_hop() -> CreateStyleInput {
        CreateStyleInput {
            name: "Hip-Hop".to_string(),
            image: ImageFile::new(vec![1, 2, 3], "hiphop.png"),
        }
    }

    async fn catalog(upload: MockUploadService) -> StyleCatalog<Persistence> {
        StyleCatalog::new(testing::persistence().await, Arc::new(upload))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let catalog = catalog(testing::accepting_uploads()).await;

        let style = catalog.create(hip_hop()).await.unwrap();

        assert_eq!(style.name, "Hip-Hop");
        assert_eq!(style.image_url, "http://test/media/styles/images/hiphop.png");
        assert_eq!(catalog.get(style.id).await.unwrap(), style);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict_without_upload() {
        let mut upload = MockUploadService::new();
        upload.expect_upload_file().times(1).returning(|_| {
            Ok(UploadedFile {
                url: "http://test/media/styles/images/hiphop.png".to_string(),
            })
        });
        upload.expect_delete_file().never();
        let catalog = catalog(upload).await;

        catalog.create(hip_hop()).await.unwrap();
        let second = catalog.create(hip_hop()).await;

        assert!(matches!(second, Err(AppError::DataConflict(_))));
    }

    #[tokio::test]
    async fn test_rename_onto_other_style_is_conflict() {
        let catalog = catalog(testing::accepting_uploads()).await;
        catalog.create(hip_hop()).await.unwrap();
        let salsa = catalog
            .create(CreateStyleInput {
                name: "Salsa".to_string(),
                image: ImageFile::new(vec![1], "salsa.png"),
            })
            .await
            .unwrap();

        let result = catalog
            .update(
                salsa.id,
                UpdateStyleInput {
                    name: Some("Hip-Hop".to_string()),
                    image: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::DataConflict(_))));

        let same_name = catalog
            .update(
                salsa.id,
                UpdateStyleInput {
                    name: Some("Salsa".to_string()),
                    image: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(same_name, salsa);
    }

    #[tokio::test]
    async fn test_update_without_image_keeps_file() {
        let mut upload = MockUploadService::new();
        upload.expect_upload_file().times(1).returning(|file| {
            Ok(UploadedFile {
                url: format!("http://test/media/{}", file.filename),
            })
        });
        upload.expect_delete_file().never();
        let catalog = catalog(upload).await;
        let style = catalog.create(hip_hop()).await.unwrap();

        let renamed = catalog
            .update(
                style.id,
                UpdateStyleInput {
                    name: Some("  Breaking ".to_string()),
                    image: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(renamed.name, "Breaking");
        assert_eq!(renamed.image_url, style.image_url);
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected() {
        let catalog = catalog(MockUploadService::new()).await;

        let result = catalog
            .create(CreateStyleInput {
                name: "   ".to_string(),
                image: ImageFile::new(vec![], "x.png"),
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    /// Another writer adds a tagged workout to `style_id` just before the
    /// next transaction opens.
    struct LateWorkout {
        inner: Arc<Persistence>,
        style_id: std::sync::Mutex<Option<i32>>,
    }

    impl LateWorkout {
        async fn insert(&self, style_id: i32) -> AppResult<()> {
            use crate::domain::{Level, NewTag, NewWorkout};
            use crate::infra::repositories::{
                TagRepository, WorkoutRepository, WorkoutTagRepository,
            };

            let repos = self.inner.repos();
            let tag = repos
                .tags()
                .add(NewTag {
                    name: "cardio".to_string(),
                })
                .await?;
            let workout = repos
                .workouts()
                .add(NewWorkout {
                    name: "Late".to_string(),
                    calories: 100,
                    duration: 10,
                    level: Level::Beginner,
                    description: "added meanwhile".to_string(),
                    dance_video: "https://video.example.com/late".to_string(),
                    thumbnail_image: "http://test/media/workouts/images/late.png".to_string(),
                    author_name: "Mia".to_string(),
                    views_count: 0,
                    style_id,
                })
                .await?;
            repos.workout_tags().insert(workout.id, tag.id).await?;
            repos.tags().increment_usages(tag.id).await?;
            Ok(())
        }
    }

    #[async_trait]
    impl UnitOfWork for LateWorkout {
        fn repos(&self) -> crate::infra::Repositories<'_, sea_orm::DatabaseConnection> {
            self.inner.repos()
        }

        async fn begin_with(
            &self,
            isolation: sea_orm::IsolationLevel,
        ) -> AppResult<crate::infra::TransactionContext> {
            let pending = self.style_id.lock().unwrap().take();
            if let Some(style_id) = pending {
                self.insert(style_id).await?;
            }
            self.inner.begin_with(isolation).await
        }
    }

    #[tokio::test]
    async fn test_delete_releases_tags_of_workouts_added_after_lookup() {
        use crate::infra::repositories::TagRepository;

        let inner = testing::persistence().await;
        let uow = Arc::new(LateWorkout {
            inner: inner.clone(),
            style_id: std::sync::Mutex::new(None),
        });
        let catalog = StyleCatalog::new(uow.clone(), Arc::new(testing::accepting_uploads()));
        let style = catalog.create(hip_hop()).await.unwrap();

        *uow.style_id.lock().unwrap() = Some(style.id);
        catalog.delete(style.id).await.unwrap();

        let cardio = inner.repos().tags().get_by_name("cardio").await.unwrap().unwrap();
        assert_eq!(cardio.usages, 0);
        assert!(catalog.detail(style.id).await.is_err());
    }
}
