//! Avatar handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};

use crate::api::extractors::MultipartForm;
use crate::api::schemas::{AvatarResponse, ImageForm};
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::Created;

/// Form field carrying the image
const IMAGE_FIELD: &str = "image";

pub fn avatar_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_avatars))
        .route("/:id", get(get_avatar))
}

pub fn avatar_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_avatar))
        .route("/:id/update", put(update_avatar))
        .route("/:id/delete", delete(delete_avatar))
}

/// Upload a new avatar image
#[utoipa::path(
    post,
    path = "/api/avatars/create",
    tag = "Avatars",
    security(("bearer_auth" = [])),
    request_body(content = ImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Avatar created", body = AvatarResponse),
        (status = 400, description = "Image missing"),
        (status = 403, description = "Staff only")
    )
)]
pub async fn create_avatar(
    State(state): State<AppState>,
    mut form: MultipartForm,
) -> AppResult<Created<AvatarResponse>> {
    let image = form.required_file(IMAGE_FIELD)?;
    let avatar = state.avatars.create(image).await?;
    Ok(Created(avatar.into()))
}

#[utoipa::path(
    get,
    path = "/api/avatars/list",
    tag = "Avatars",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All avatars", body = Vec<AvatarResponse>))
)]
pub async fn list_avatars(State(state): State<AppState>) -> AppResult<Json<Vec<AvatarResponse>>> {
    let avatars = state.avatars.list().await?;
    Ok(Json(avatars.into_iter().map(AvatarResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/avatars/{id}",
    tag = "Avatars",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Avatar id")),
    responses(
        (status = 200, description = "Avatar", body = AvatarResponse),
        (status = 404, description = "Avatar not found")
    )
)]
pub async fn get_avatar(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AvatarResponse>> {
    let avatar = state.avatars.get(id).await?;
    Ok(Json(avatar.into()))
}

/// Replace an avatar's image
#[utoipa::path(
    put,
    path = "/api/avatars/{id}/update",
    tag = "Avatars",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Avatar id")),
    request_body(content = ImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Avatar updated", body = AvatarResponse),
        (status = 404, description = "Avatar not found")
    )
)]
pub async fn update_avatar(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut form: MultipartForm,
) -> AppResult<Json<AvatarResponse>> {
    let image = form.required_file(IMAGE_FIELD)?;
    let avatar = state.avatars.update(id, image).await?;
    Ok(Json(avatar.into()))
}

#[utoipa::path(
    delete,
    path = "/api/avatars/{id}/delete",
    tag = "Avatars",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Avatar id")),
    responses(
        (status = 204, description = "Avatar deleted"),
        (status = 404, description = "Avatar not found")
    )
)]
pub async fn delete_avatar(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.avatars.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
