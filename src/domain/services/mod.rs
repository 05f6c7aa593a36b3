//! Domain services: stateless transforms from inputs to entities.
//!
//! None of these touch storage. Merges follow one rule: a supplied value
//! replaces the current one, an absent value keeps it.

mod avatar;
mod style;
mod tag;
mod user;
mod workout;

pub use avatar::AvatarService;
pub use style::StyleService;
pub use tag::TagService;
pub use user::UserService;
pub use workout::WorkoutService;
