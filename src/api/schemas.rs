//! Response bodies shared by the handlers.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Avatar, Level, Style, Tag, Workout};
use crate::types::Paginated;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvatarResponse {
    pub id: i32,
    #[schema(example = "http://localhost:8000/media/avatars/images/me_1a2b3.png")]
    pub image_url: String,
}

impl From<Avatar> for AvatarResponse {
    fn from(avatar: Avatar) -> Self {
        Self {
            id: avatar.id,
            image_url: avatar.image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StyleResponse {
    pub id: i32,
    #[schema(example = "Hip-Hop")]
    pub name: String,
    pub image_url: String,
}

impl From<Style> for StyleResponse {
    fn from(style: Style) -> Self {
        Self {
            id: style.id,
            name: style.name,
            image_url: style.image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagResponse {
    pub id: i32,
    #[schema(example = "cardio")]
    pub name: String,
    /// Number of workouts using the tag
    pub usages: i32,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            usages: tag.usages,
        }
    }
}

/// Short workout entry listed under a tag or a style
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkoutSummary {
    pub id: i32,
    pub name: String,
    pub thumbnail_image: String,
    pub author_name: String,
    pub views_count: i32,
}

impl From<Workout> for WorkoutSummary {
    fn from(workout: Workout) -> Self {
        Self {
            id: workout.id,
            name: workout.name,
            thumbnail_image: workout.thumbnail_image,
            author_name: workout.author_name,
            views_count: workout.views_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagWorkoutsResponse {
    pub id: i32,
    pub name: String,
    pub usages: i32,
    pub workouts: Vec<WorkoutSummary>,
}

impl From<(Tag, Vec<Workout>)> for TagWorkoutsResponse {
    fn from((tag, workouts): (Tag, Vec<Workout>)) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            usages: tag.usages,
            workouts: workouts.into_iter().map(WorkoutSummary::from).collect(),
        }
    }
}

/// One page of tags
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagPage {
    pub items: Vec<TagResponse>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

impl From<Paginated<Tag>> for TagPage {
    fn from(page: Paginated<Tag>) -> Self {
        let page = page.map(TagResponse::from);
        Self {
            items: page.items,
            total_count: page.total_count,
            page: page.page,
            page_size: page.page_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StyleDetailResponse {
    pub id: i32,
    pub name: String,
    pub image_url: String,
    pub workouts: Vec<WorkoutSummary>,
}

impl From<(Style, Vec<Workout>)> for StyleDetailResponse {
    fn from((style, workouts): (Style, Vec<Workout>)) -> Self {
        Self {
            id: style.id,
            name: style.name,
            image_url: style.image_url,
            workouts: workouts.into_iter().map(WorkoutSummary::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkoutResponse {
    pub id: i32,
    #[schema(example = "Morning Groove")]
    pub name: String,
    pub calories: i32,
    /// Minutes
    pub duration: i32,
    pub level: Level,
    pub description: String,
    pub dance_video: String,
    pub thumbnail_image: String,
    pub author_name: String,
    pub views_count: i32,
    pub style_id: i32,
    pub tags: Vec<TagResponse>,
}

impl From<Workout> for WorkoutResponse {
    fn from(workout: Workout) -> Self {
        Self {
            id: workout.id,
            name: workout.name,
            calories: workout.calories,
            duration: workout.duration,
            level: workout.level,
            description: workout.description,
            dance_video: workout.dance_video,
            thumbnail_image: workout.thumbnail_image,
            author_name: workout.author_name,
            views_count: workout.views_count,
            style_id: workout.style_id,
            tags: workout.tags.into_iter().map(TagResponse::from).collect(),
        }
    }
}

/// Workout as listed, with its style
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkoutListItem {
    #[serde(flatten)]
    pub workout: WorkoutResponse,
    pub style: StyleResponse,
}

impl From<(Workout, Style)> for WorkoutListItem {
    fn from((workout, style): (Workout, Style)) -> Self {
        Self {
            workout: workout.into(),
            style: style.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkoutCreatedResponse {
    #[schema(example = "Workout successfully created")]
    pub message: String,
    pub workout_id: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagCreatedResponse {
    #[schema(example = "Tag successfully created")]
    pub message: String,
    pub tag_id: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ViewsResponse {
    pub id: i32,
    pub views_count: i32,
}

// Multipart bodies, described for the OpenAPI document only. Handlers read
// them field by field through `MultipartForm`.

/// `multipart/form-data` with a single image
#[derive(Debug, ToSchema)]
pub struct ImageForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[derive(Debug, ToSchema)]
pub struct StyleForm {
    #[schema(example = "Hip-Hop")]
    pub name: String,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Both fields optional, absent ones stay unchanged
#[derive(Debug, ToSchema)]
pub struct StyleUpdateForm {
    pub name: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[derive(Debug, ToSchema)]
pub struct WorkoutForm {
    pub name: String,
    pub calories: i32,
    /// Minutes
    pub duration: i32,
    pub level: Level,
    pub description: String,
    pub dance_video: String,
    pub author_name: String,
    pub style_id: i32,
    /// Repeated field or comma separated names
    pub tags: Option<Vec<String>>,
    #[schema(value_type = String, format = Binary)]
    pub thumbnail: Vec<u8>,
}

/// Any subset of the workout fields
#[derive(Debug, ToSchema)]
pub struct WorkoutUpdateForm {
    pub name: Option<String>,
    pub calories: Option<i32>,
    pub duration: Option<i32>,
    pub level: Option<Level>,
    pub description: Option<String>,
    pub dance_video: Option<String>,
    pub author_name: Option<String>,
    pub style_id: Option<i32>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub thumbnail: Option<Vec<u8>>,
}
