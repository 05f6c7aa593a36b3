use crate::domain::entities::{NewWorkout, Workout, WorkoutChanges, WorkoutDraft};
use crate::domain::value_objects::Level;

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkoutService;

impl WorkoutService {
    /// Map a draft to an unsaved workout. Views always start at zero.
    pub fn create_workout_entity(&self, draft: WorkoutDraft, thumbnail_image: String) -> NewWorkout {
        NewWorkout {
            name: draft.name,
            calories: draft.calories,
            duration: draft.duration,
            level: draft.level,
            description: draft.description,
            dance_video: draft.dance_video,
            thumbnail_image,
            author_name: draft.author_name,
            views_count: 0,
            style_id: draft.style_id,
        }
    }

    /// Merge `changes` into `existing`. `views_count` and tags are carried over;
    /// an unparseable level keeps the current one.
    pub fn update_workout(&self, existing: &Workout, changes: WorkoutChanges) -> Workout {
        let level = changes
            .level
            .as_deref()
            .and_then(Level::parse_lenient)
            .unwrap_or(existing.level);

        Workout {
            id: existing.id,
            name: changes.name.unwrap_or_else(|| existing.name.clone()),
            calories: changes.calories.unwrap_or(existing.calories),
            duration: changes.duration.unwrap_or(existing.duration),
            level,
            description: changes
                .description
                .unwrap_or_else(|| existing.description.clone()),
            dance_video: changes
                .dance_video
                .unwrap_or_else(|| existing.dance_video.clone()),
            thumbnail_image: changes
                .thumbnail_image
                .unwrap_or_else(|| existing.thumbnail_image.clone()),
            author_name: changes
                .author_name
                .unwrap_or_else(|| existing.author_name.clone()),
            views_count: existing.views_count,
            style_id: changes.style_id.unwrap_or(existing.style_id),
            tags: existing.tags.clone(),
        }
    }
}
