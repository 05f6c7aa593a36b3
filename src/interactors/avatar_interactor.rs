//! Avatar images users can pick for their profile.

use std::sync::Arc;

use async_trait::async_trait;

use super::{compensate, reclaim, ImageFile};
use crate::config::AVATAR_IMAGE_DIR;
use crate::domain::{Avatar, AvatarService};
use crate::errors::{AppResult, OptionExt};
use crate::infra::repositories::AvatarRepository;
use crate::infra::{UnitOfWork, UploadService};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AvatarInteractor: Send + Sync {
    async fn create(&self, image: ImageFile) -> AppResult<Avatar>;

    async fn list(&self) -> AppResult<Vec<Avatar>>;

    async fn get(&self, id: i32) -> AppResult<Avatar>;

    /// Replace the image. The previous file is deleted once the change is committed.
    async fn update(&self, id: i32, image: ImageFile) -> AppResult<Avatar>;

    /// Users wearing the avatar keep their account and lose the reference.
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct AvatarGallery<U: UnitOfWork> {
    uow: Arc<U>,
    upload: Arc<dyn UploadService>,
    avatars: AvatarService,
}

impl<U: UnitOfWork> AvatarGallery<U> {
    pub fn new(uow: Arc<U>, upload: Arc<dyn UploadService>) -> Self {
        Self {
            uow,
            upload,
            avatars: AvatarService,
        }
    }

    async fn find(&self, id: i32) -> AppResult<Avatar> {
        self.uow
            .repos()
            .avatars()
            .get_by_id(id)
            .await?
            .ok_or_not_found(|| format!("Avatar with id {} not found", id))
    }
}

#[async_trait]
impl<U: UnitOfWork> AvatarInteractor for AvatarGallery<U> {
    async fn create(&self, image: ImageFile) -> AppResult<Avatar> {
        let uploaded = self
            .upload
            .upload_file(image.into_upload(AVATAR_IMAGE_DIR))
            .await?;
        let new_avatar = self.avatars.create_avatar(uploaded.url.clone());

        let result = self
            .uow
            .transaction(move |tx| async move { tx.repos().avatars().add(new_avatar).await })
            .await;
        let avatar = compensate(self.upload.as_ref(), Some(&uploaded.url), result).await?;

        tracing::info!(avatar_id = avatar.id, "Avatar created");
        Ok(avatar)
    }

    async fn list(&self) -> AppResult<Vec<Avatar>> {
        self.uow.repos().avatars().list().await
    }

    async fn get(&self, id: i32) -> AppResult<Avatar> {
        self.find(id).await
    }

    async fn update(&self, id: i32, image: ImageFile) -> AppResult<Avatar> {
        let existing = self.find(id).await?;

        let uploaded = self
            .upload
            .upload_file(image.into_upload(AVATAR_IMAGE_DIR))
            .await?;
        let changed = self
            .avatars
            .update_avatar(&existing, Some(uploaded.url.clone()));

        let result = self
            .uow
            .transaction(move |tx| async move { tx.repos().avatars().update(&changed).await })
            .await;
        let avatar = compensate(self.upload.as_ref(), Some(&uploaded.url), result).await?;

        reclaim(self.upload.as_ref(), &existing.image_url).await;
        tracing::info!(avatar_id = avatar.id, "Avatar image replaced");
        Ok(avatar)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let existing = self.find(id).await?;

        self.uow
            .transaction(move |tx| async move { tx.repos().avatars().delete(id).await })
            .await?;

        reclaim(self.upload.as_ref(), &existing.image_url).await;
        tracing::info!(avatar_id = id, "Avatar deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UploadedFile;
    use crate::errors::AppError;
    use crate::infra::{MockUploadService, Persistence};
    use crate::interactors::testing;

    fn image(name: &str) -> ImageFile {
        ImageFile::new(vec![0xFF, 0xD8], name)
    }

    async fn gallery(upload: MockUploadService) -> AvatarGallery<Persistence> {
        AvatarGallery::new(testing::persistence().await, Arc::new(upload))
    }

    #[tokio::test]
    async fn test_create_stores_image_under_avatar_dir() {
        let gallery = gallery(testing::accepting_uploads()).await;

        let avatar = gallery.create(image("me.jpg")).await.unwrap();

        assert_eq!(avatar.image_url, "http://test/media/avatars/images/me.jpg");
        assert_eq!(gallery.get(avatar.id).await.unwrap(), avatar);
    }

    #[tokio::test]
    async fn test_update_reclaims_previous_image_after_commit() {
        let mut upload = MockUploadService::new();
        let mut urls = vec!["http://test/media/new.jpg", "http://test/media/old.jpg"];
        upload.expect_upload_file().times(2).returning(move |_| {
            Ok(UploadedFile {
                url: urls.pop().unwrap_or_default().to_string(),
            })
        });
        upload
            .expect_delete_file()
            .withf(|url| url == "http://test/media/old.jpg")
            .times(1)
            .returning(|_| Ok(true));
        let gallery = gallery(upload).await;

        let avatar = gallery.create(image("old.jpg")).await.unwrap();
        let updated = gallery.update(avatar.id, image("new.jpg")).await.unwrap();

        assert_eq!(updated.image_url, "http://test/media/new.jpg");
    }

    #[tokio::test]
    async fn test_update_missing_avatar_uploads_nothing() {
        let mut upload = MockUploadService::new();
        upload.expect_upload_file().never();
        let gallery = gallery(upload).await;

        let result = gallery.update(42, image("x.jpg")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_row_and_file() {
        let gallery = gallery(testing::accepting_uploads()).await;
        let avatar = gallery.create(image("bye.jpg")).await.unwrap();

        gallery.delete(avatar.id).await.unwrap();

        assert!(matches!(gallery.get(avatar.id).await, Err(AppError::NotFound(_))));
        assert!(gallery.list().await.unwrap().is_empty());
    }
}
