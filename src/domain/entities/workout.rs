//! Workout entity and its write-side shapes.

use super::tag::Tag;
use crate::domain::value_objects::Level;

/// Scalar fields a client supplies when creating a workout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutDraft {
    pub name: String,
    pub calories: i32,
    pub duration: i32,
    pub level: Level,
    pub description: String,
    pub dance_video: String,
    pub author_name: String,
    pub style_id: i32,
}

/// Workout ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkout {
    pub name: String,
    pub calories: i32,
    pub duration: i32,
    pub level: Level,
    pub description: String,
    pub dance_video: String,
    pub thumbnail_image: String,
    pub author_name: String,
    pub views_count: i32,
    pub style_id: i32,
}

/// Persisted workout with its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    pub id: i32,
    pub name: String,
    pub calories: i32,
    pub duration: i32,
    pub level: Level,
    pub description: String,
    pub dance_video: String,
    pub thumbnail_image: String,
    pub author_name: String,
    pub views_count: i32,
    pub style_id: i32,
    pub tags: Vec<Tag>,
}

/// Partial update. `None` keeps the current value.
///
/// `level` is taken in its textual form (`Level::to_string()` for typed
/// callers) and parsed case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutChanges {
    pub name: Option<String>,
    pub calories: Option<i32>,
    pub duration: Option<i32>,
    pub level: Option<String>,
    pub description: Option<String>,
    pub dance_video: Option<String>,
    pub thumbnail_image: Option<String>,
    pub author_name: Option<String>,
    pub style_id: Option<i32>,
}
