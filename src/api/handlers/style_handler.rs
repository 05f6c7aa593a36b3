//! Dance style handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};

use crate::api::extractors::MultipartForm;
use crate::api::schemas::{StyleDetailResponse, StyleForm, StyleResponse, StyleUpdateForm};
use crate::api::AppState;
use crate::errors::AppResult;
use crate::interactors::{CreateStyleInput, UpdateStyleInput};
use crate::types::Created;

pub fn style_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_styles))
        .route("/:id", get(get_style))
        .route("/:id/detail", get(get_style_detail))
}

pub fn style_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_style))
        .route("/:id/update", put(update_style))
        .route("/:id/delete", delete(delete_style))
}

/// Create a style from a name and an image
#[utoipa::path(
    post,
    path = "/api/styles/create",
    tag = "Styles",
    security(("bearer_auth" = [])),
    request_body(content = StyleForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Style created", body = StyleResponse),
        (status = 400, description = "Missing field"),
        (status = 409, description = "Style name already used")
    )
)]
pub async fn create_style(
    State(state): State<AppState>,
    mut form: MultipartForm,
) -> AppResult<Created<StyleResponse>> {
    let input = CreateStyleInput {
        name: form.required_text("name")?,
        image: form.required_file("image")?,
    };
    let style = state.styles.create(input).await?;
    Ok(Created(style.into()))
}

#[utoipa::path(
    get,
    path = "/api/styles/list",
    tag = "Styles",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All styles", body = Vec<StyleResponse>))
)]
pub async fn list_styles(State(state): State<AppState>) -> AppResult<Json<Vec<StyleResponse>>> {
    let styles = state.styles.list().await?;
    Ok(Json(styles.into_iter().map(StyleResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/styles/{id}",
    tag = "Styles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Style id")),
    responses(
        (status = 200, description = "Style", body = StyleResponse),
        (status = 404, description = "Style not found")
    )
)]
pub async fn get_style(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<StyleResponse>> {
    let style = state.styles.get(id).await?;
    Ok(Json(style.into()))
}

/// Style with its workouts
#[utoipa::path(
    get,
    path = "/api/styles/{id}/detail",
    tag = "Styles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Style id")),
    responses(
        (status = 200, description = "Style and workouts", body = StyleDetailResponse),
        (status = 404, description = "Style not found")
    )
)]
pub async fn get_style_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<StyleDetailResponse>> {
    let detail = state.styles.detail(id).await?;
    Ok(Json(detail.into()))
}

/// Rename a style and/or replace its image
#[utoipa::path(
    put,
    path = "/api/styles/{id}/update",
    tag = "Styles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Style id")),
    request_body(content = StyleUpdateForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Style updated", body = StyleResponse),
        (status = 404, description = "Style not found"),
        (status = 409, description = "Style name already used")
    )
)]
pub async fn update_style(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut form: MultipartForm,
) -> AppResult<Json<StyleResponse>> {
    let input = UpdateStyleInput {
        name: form.text("name"),
        image: form.take_file("image"),
    };
    let style = state.styles.update(id, input).await?;
    Ok(Json(style.into()))
}

/// Delete a style together with its workouts
#[utoipa::path(
    delete,
    path = "/api/styles/{id}/delete",
    tag = "Styles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Style id")),
    responses(
        (status = 204, description = "Style deleted"),
        (status = 404, description = "Style not found")
    )
)]
pub async fn delete_style(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.styles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
