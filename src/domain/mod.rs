//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.
//!
//! Contains: Value Objects, Entities, Domain Services.

pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::{
    Avatar, Client, FileUpload, NewAvatar, NewClient, NewStaff, NewStyle, NewTag, NewUser,
    NewWorkout, Staff, Style, Tag, UploadedFile, User, Workout, WorkoutChanges, WorkoutDraft,
};
pub use services::{AvatarService, StyleService, TagService, UserService, WorkoutService};
pub use value_objects::{Email, Level, Password, StaffRole};
