//! Workout catalog - backend for a dance workout library
//!
//! Styles group workouts, tags label them, and accounts are either clients
//! or staff. Every write runs inside one database transaction; images are
//! uploaded before the transaction and removed again if it rolls back.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities, value objects and pure domain services
//! - **interactors**: Use cases, one per aggregate, over a unit of work
//! - **infra**: Database, repositories, unit of work, uploads, JWT
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod interactors;
pub mod types;

// Re-export commonly used types at crate root
pub use api::{create_router, AppState};
pub use config::Config;
pub use errors::{AppError, AppResult};
