//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Unit of Work for transaction management
//! - File storage for uploaded images
//! - JWT signing

pub mod db;
pub mod jwt;
pub mod repositories;
pub mod unit_of_work;
pub mod upload;

pub use db::{Database, MigrationState, Migrator};
pub use jwt::{JwtService, TokenClaims};
pub use repositories::Repositories;
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};
pub use upload::{LocalUploadService, UploadService};

#[cfg(any(test, feature = "test-utils"))]
pub use upload::MockUploadService;
