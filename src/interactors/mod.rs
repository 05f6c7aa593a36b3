//! Interactors - one user-facing use case per method.
//!
//! Every write follows the same discipline:
//! 1. referenced entities and uniqueness are checked before anything changes,
//! 2. at most one file is uploaded,
//! 3. database writes run inside one unit-of-work transaction,
//! 4. if anything fails the transaction is rolled back and the file uploaded
//!    by this call is deleted again,
//! 5. files superseded by the change are deleted only after the commit.

mod avatar_interactor;
pub mod container;
mod style_interactor;
mod tag_interactor;
mod user_interactor;
mod workout_interactor;

#[cfg(test)]
pub(crate) mod testing;

use crate::domain::FileUpload;
use crate::errors::AppResult;
use crate::infra::UploadService;

pub use avatar_interactor::{AvatarGallery, AvatarInteractor};
pub use container::{InteractorContainer, Interactors};
pub use style_interactor::{CreateStyleInput, StyleCatalog, StyleInteractor, UpdateStyleInput};
pub use tag_interactor::{TagCatalog, TagInteractor, TagSearch};
pub use user_interactor::{
    Accounts, Credentials, Principal, ProfileChanges, StaffSignUp, TokenPair, UserInteractor,
    UserProfile,
};
pub use workout_interactor::{
    CreateWorkoutInput, UpdateWorkoutInput, WorkoutCatalog, WorkoutInteractor,
};

#[cfg(any(test, feature = "test-utils"))]
pub use avatar_interactor::MockAvatarInteractor;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockInteractorContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use style_interactor::MockStyleInteractor;
#[cfg(any(test, feature = "test-utils"))]
pub use tag_interactor::MockTagInteractor;
#[cfg(any(test, feature = "test-utils"))]
pub use user_interactor::MockUserInteractor;
#[cfg(any(test, feature = "test-utils"))]
pub use workout_interactor::MockWorkoutInteractor;

/// Image received from a client, not yet stored.
#[derive(Clone)]
pub struct ImageFile {
    pub content: Vec<u8>,
    pub filename: String,
}

impl ImageFile {
    pub fn new(content: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            content,
            filename: filename.into(),
        }
    }

    fn into_upload(self, directory: &str) -> FileUpload {
        FileUpload::new(self.content, self.filename, directory)
    }
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("filename", &self.filename)
            .field("bytes", &self.content.len())
            .finish()
    }
}

/// Pass `result` through; on failure first delete the file this call uploaded.
async fn compensate<T>(
    upload: &dyn UploadService,
    uploaded_url: Option<&str>,
    result: AppResult<T>,
) -> AppResult<T> {
    if let (Err(e), Some(url)) = (&result, uploaded_url) {
        tracing::warn!(url, error = %e, "Write rolled back, discarding uploaded file");
        if let Err(delete_err) = upload.delete_file(url).await {
            tracing::error!(url, error = %delete_err, "Failed to discard uploaded file");
        }
    }
    result
}

/// Delete a file that a committed change no longer references.
async fn reclaim(upload: &dyn UploadService, url: &str) {
    match upload.delete_file(url).await {
        Ok(true) => tracing::debug!(url, "Reclaimed superseded file"),
        Ok(false) => tracing::debug!(url, "Superseded file was already gone"),
        Err(e) => tracing::error!(url, error = %e, "Failed to reclaim superseded file"),
    }
}
