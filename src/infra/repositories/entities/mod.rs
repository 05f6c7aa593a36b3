//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod avatar;
pub mod client;
pub mod staff;
pub mod style;
pub mod tag;
pub mod user;
pub mod workout;
pub mod workout_tag;
