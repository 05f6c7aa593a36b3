//! Workout handlers.
//!
//! Create and update take multipart forms because they carry the thumbnail.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{MultipartForm, ValidatedJson};
use crate::api::schemas::{
    ViewsResponse, WorkoutCreatedResponse, WorkoutForm, WorkoutListItem, WorkoutResponse,
    WorkoutUpdateForm,
};
use crate::api::AppState;
use crate::domain::{WorkoutChanges, WorkoutDraft};
use crate::errors::AppResult;
use crate::interactors::{CreateWorkoutInput, UpdateWorkoutInput};
use crate::types::{Created, MessageResponse};

const THUMBNAIL_FIELD: &str = "thumbnail";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddTagsRequest {
    #[validate(length(min = 1, message = "At least one tag is required"))]
    #[schema(example = json!(["cardio", "hiit"]))]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct WorkoutViewRequest {
    #[validate(range(min = 1, message = "workout_id must be positive"))]
    pub workout_id: i32,
}

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_workouts))
        .route("/:id", get(get_workout))
        .route("/workout/update-views", put(increment_views))
}

pub fn workout_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_workout))
        .route("/:id/update", put(update_workout))
        .route("/:id/delete", delete(delete_workout))
        .route("/:id/add-tag", post(add_tags))
        .route("/:id/delete/:tag_id/tag", delete(remove_tag))
}

fn draft_from(form: &MultipartForm) -> AppResult<WorkoutDraft> {
    Ok(WorkoutDraft {
        name: form.required_text("name")?,
        calories: form.required("calories")?,
        duration: form.required("duration")?,
        level: form.required("level")?,
        description: form.required_text("description")?,
        dance_video: form.required_text("dance_video")?,
        author_name: form.required_text("author_name")?,
        style_id: form.required("style_id")?,
    })
}

fn changes_from(form: &MultipartForm) -> AppResult<WorkoutChanges> {
    Ok(WorkoutChanges {
        name: form.text("name"),
        calories: form.parse("calories")?,
        duration: form.parse("duration")?,
        level: form.text("level"),
        description: form.text("description"),
        dance_video: form.text("dance_video"),
        thumbnail_image: None,
        author_name: form.text("author_name"),
        style_id: form.parse("style_id")?,
    })
}

/// Create a workout, its thumbnail and its tags
#[utoipa::path(
    post,
    path = "/api/workouts/create",
    tag = "Workouts",
    security(("bearer_auth" = [])),
    request_body(content = WorkoutForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Workout created", body = WorkoutCreatedResponse),
        (status = 400, description = "Missing or invalid field"),
        (status = 404, description = "Style not found"),
        (status = 409, description = "Workout name already used")
    )
)]
pub async fn create_workout(
    State(state): State<AppState>,
    mut form: MultipartForm,
) -> AppResult<Created<WorkoutCreatedResponse>> {
    let input = CreateWorkoutInput {
        draft: draft_from(&form)?,
        tags: form.list("tags"),
        thumbnail: form.required_file(THUMBNAIL_FIELD)?,
    };
    let workout = state.workouts.create(input).await?;
    Ok(Created(WorkoutCreatedResponse {
        message: "Workout successfully created".to_string(),
        workout_id: workout.id,
    }))
}

/// Every workout with its style
#[utoipa::path(
    get,
    path = "/api/workouts/list",
    tag = "Workouts",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All workouts", body = Vec<WorkoutListItem>))
)]
pub async fn list_workouts(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<WorkoutListItem>>> {
    let workouts = state.workouts.list().await?;
    Ok(Json(workouts.into_iter().map(WorkoutListItem::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/workouts/{id}",
    tag = "Workouts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Workout id")),
    responses(
        (status = 200, description = "Workout", body = WorkoutResponse),
        (status = 404, description = "Workout not found")
    )
)]
pub async fn get_workout(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<WorkoutResponse>> {
    let workout = state.workouts.get(id).await?;
    Ok(Json(workout.into()))
}

/// Change any subset of fields; a new thumbnail replaces the old file
#[utoipa::path(
    put,
    path = "/api/workouts/{id}/update",
    tag = "Workouts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Workout id")),
    request_body(content = WorkoutUpdateForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Workout updated", body = WorkoutResponse),
        (status = 404, description = "Workout or style not found"),
        (status = 409, description = "Workout name already used")
    )
)]
pub async fn update_workout(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut form: MultipartForm,
) -> AppResult<Json<WorkoutResponse>> {
    let input = UpdateWorkoutInput {
        changes: changes_from(&form)?,
        thumbnail: form.take_file(THUMBNAIL_FIELD),
    };
    let workout = state.workouts.update(id, input).await?;
    Ok(Json(workout.into()))
}

/// Count one view
#[utoipa::path(
    put,
    path = "/api/workouts/workout/update-views",
    tag = "Workouts",
    security(("bearer_auth" = [])),
    request_body = WorkoutViewRequest,
    responses(
        (status = 200, description = "New view count", body = ViewsResponse),
        (status = 404, description = "Workout not found")
    )
)]
pub async fn increment_views(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<WorkoutViewRequest>,
) -> AppResult<Json<ViewsResponse>> {
    let views_count = state.workouts.increment_views(payload.workout_id).await?;
    Ok(Json(ViewsResponse {
        id: payload.workout_id,
        views_count,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/workouts/{id}/delete",
    tag = "Workouts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Workout id")),
    responses(
        (status = 204, description = "Workout deleted"),
        (status = 404, description = "Workout not found")
    )
)]
pub async fn delete_workout(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.workouts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attach tags by name, creating missing ones
#[utoipa::path(
    post,
    path = "/api/workouts/{id}/add-tag",
    tag = "Workouts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Workout id")),
    request_body = AddTagsRequest,
    responses(
        (status = 200, description = "Tags attached", body = MessageResponse),
        (status = 404, description = "Workout not found")
    )
)]
pub async fn add_tags(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<AddTagsRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.workouts.add_tags(id, payload.tags).await?;
    Ok(Json(MessageResponse::new("Tags added successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/workouts/{id}/delete/{tag_id}/tag",
    tag = "Workouts",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Workout id"),
        ("tag_id" = i32, Path, description = "Tag id")
    ),
    responses(
        (status = 200, description = "Tag detached", body = MessageResponse),
        (status = 400, description = "Tag is not attached to the workout"),
        (status = 404, description = "Workout or tag not found")
    )
)]
pub async fn remove_tag(
    State(state): State<AppState>,
    Path((id, tag_id)): Path<(i32, i32)>,
) -> AppResult<Json<MessageResponse>> {
    state.workouts.remove_tag(id, tag_id).await?;
    Ok(Json(MessageResponse::new("Tag deleted successfully")))
}
