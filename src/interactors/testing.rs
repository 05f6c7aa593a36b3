//! Fixtures shared by the interactor unit tests.

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;

use crate::config::Config;
use crate::domain::UploadedFile;
use crate::infra::{Migrator, MockUploadService, Persistence};

pub(crate) const TEST_SECRET: &str = "interactor-test-secret-0123456789abcdef";

/// Fresh in-memory database with the schema applied.
pub(crate) async fn persistence() -> Arc<Persistence> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(Persistence::new(db))
}

pub(crate) fn config() -> Config {
    Config::new("sqlite::memory:", TEST_SECRET)
}

/// Upload mock that hands out `http://test/media/{directory}/{filename}`
/// and accepts every delete.
pub(crate) fn accepting_uploads() -> MockUploadService {
    let mut upload = MockUploadService::new();
    upload.expect_upload_file().returning(|file| {
        Ok(UploadedFile {
            url: format!("http://test/media/{}/{}", file.directory, file.filename),
        })
    });
    upload.expect_delete_file().returning(|_| Ok(true));
    upload
}
