//! Domain entities.
//!
//! `NewX` values have not been persisted yet; `X` values carry the id the
//! store assigned.

mod avatar;
mod client;
mod staff;
mod style;
mod tag;
mod upload;
mod user;
mod workout;

pub use avatar::{Avatar, NewAvatar};
pub use client::{Client, NewClient};
pub use staff::{NewStaff, Staff};
pub use style::{NewStyle, Style};
pub use tag::{NewTag, Tag};
pub use upload::{FileUpload, UploadedFile};
pub use user::{NewUser, User};
pub use workout::{NewWorkout, Workout, WorkoutChanges, WorkoutDraft};
