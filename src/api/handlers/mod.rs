//! HTTP request handlers, one module per resource.
//!
//! Each module exposes the routes open to any signed-in user and, where the
//! resource has them, the staff-only routes.

pub mod avatar_handler;
pub mod style_handler;
pub mod tag_handler;
pub mod user_handler;
pub mod workout_handler;

pub use avatar_handler::{avatar_admin_routes, avatar_routes};
pub use style_handler::{style_admin_routes, style_routes};
pub use tag_handler::{tag_admin_routes, tag_routes};
pub use user_handler::{user_public_routes, user_routes};
pub use workout_handler::{workout_admin_routes, workout_routes};
