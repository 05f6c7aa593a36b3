//! Helpers shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;

use workout_catalog::config::Config;
use workout_catalog::domain::{FileUpload, UploadedFile};
use workout_catalog::errors::AppResult;
use workout_catalog::infra::{Migrator, UploadService};
use workout_catalog::interactors::ImageFile;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

mock! {
    pub Upload {}

    #[async_trait]
    impl UploadService for Upload {
        async fn upload_file(&self, file: FileUpload) -> AppResult<UploadedFile>;
        async fn delete_file(&self, url: &str) -> AppResult<bool>;
    }
}

/// In-memory SQLite over a single pooled connection, schema applied.
pub async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn config() -> Config {
    Config::new("sqlite::memory:", TEST_SECRET)
}

/// Upload mock answering `http://test/media/{directory}/{filename}` and
/// accepting every delete.
pub fn accepting_uploads() -> MockUpload {
    let mut upload = MockUpload::new();
    upload.expect_upload_file().returning(|file| {
        Ok(UploadedFile {
            url: format!("http://test/media/{}/{}", file.directory, file.filename),
        })
    });
    upload.expect_delete_file().returning(|_| Ok(true));
    upload
}

pub fn image(filename: &str) -> ImageFile {
    ImageFile::new(vec![0x89, b'P', b'N', b'G'], filename)
}

pub async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            format!("SELECT COUNT(*) AS count FROM {}", table),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "count").unwrap()
}
