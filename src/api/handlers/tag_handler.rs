//! Tag handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::schemas::{TagCreatedResponse, TagPage, TagResponse, TagWorkoutsResponse};
use crate::api::AppState;
use crate::errors::AppResult;
use crate::infra::repositories::TagFilter;
use crate::interactors::TagSearch;
use crate::types::{Created, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TagNameRequest {
    #[validate(length(min = 1, max = 100, message = "Tag name must be 1 to 100 characters"))]
    #[schema(example = "cardio")]
    pub name: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameSearchQuery {
    /// Case-insensitive substring
    pub name: String,
    #[serde(default)]
    pub with_workouts: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MinUsagesQuery {
    pub min_usages: i32,
    #[serde(default)]
    pub with_workouts: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaxUsagesQuery {
    pub max_usages: i32,
    #[serde(default)]
    pub with_workouts: bool,
}

pub fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_tags))
        .route("/popular", get(popular_tags))
        .route("/search/by-name", get(search_by_name))
        .route("/search/by-min-usages", get(search_by_min_usages))
        .route("/search/by-max-usages", get(search_by_max_usages))
}

pub fn tag_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_tag))
        .route("/:id", get(get_tag))
        .route("/:id/update", put(update_tag))
        .route("/:id/delete", delete(delete_tag))
}

#[utoipa::path(
    post,
    path = "/api/tags/create",
    tag = "Tags",
    security(("bearer_auth" = [])),
    request_body = TagNameRequest,
    responses(
        (status = 201, description = "Tag created", body = TagCreatedResponse),
        (status = 409, description = "Tag name already used")
    )
)]
pub async fn create_tag(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TagNameRequest>,
) -> AppResult<Created<TagCreatedResponse>> {
    let tag = state.tags.create(payload.name).await?;
    Ok(Created(TagCreatedResponse {
        message: "Tag successfully created".to_string(),
        tag_id: tag.id,
    }))
}

/// Tags ordered by id, one page at a time
#[utoipa::path(
    get,
    path = "/api/tags/list",
    tag = "Tags",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses((status = 200, description = "Page of tags", body = TagPage))
)]
pub async fn list_tags(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<TagPage>> {
    let page = state.tags.list(params).await?;
    Ok(Json(page.into()))
}

/// Most used tags first
#[utoipa::path(
    get,
    path = "/api/tags/popular",
    tag = "Tags",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses((status = 200, description = "Page of tags", body = TagPage))
)]
pub async fn popular_tags(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<TagPage>> {
    let page = state.tags.popular(params).await?;
    Ok(Json(page.into()))
}

async fn search(
    state: &AppState,
    filter: TagFilter,
    with_workouts: bool,
) -> AppResult<Json<Vec<TagWorkoutsResponse>>> {
    let found = state
        .tags
        .search(TagSearch {
            filter,
            with_workouts,
        })
        .await?;
    Ok(Json(found.into_iter().map(TagWorkoutsResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/tags/search/by-name",
    tag = "Tags",
    security(("bearer_auth" = [])),
    params(NameSearchQuery),
    responses((status = 200, description = "Matching tags", body = Vec<TagWorkoutsResponse>))
)]
pub async fn search_by_name(
    State(state): State<AppState>,
    Query(query): Query<NameSearchQuery>,
) -> AppResult<Json<Vec<TagWorkoutsResponse>>> {
    let filter = TagFilter {
        name: Some(query.name),
        ..Default::default()
    };
    search(&state, filter, query.with_workouts).await
}

#[utoipa::path(
    get,
    path = "/api/tags/search/by-min-usages",
    tag = "Tags",
    security(("bearer_auth" = [])),
    params(MinUsagesQuery),
    responses((status = 200, description = "Tags used at least `min_usages` times", body = Vec<TagWorkoutsResponse>))
)]
pub async fn search_by_min_usages(
    State(state): State<AppState>,
    Query(query): Query<MinUsagesQuery>,
) -> AppResult<Json<Vec<TagWorkoutsResponse>>> {
    let filter = TagFilter {
        min_usages: Some(query.min_usages),
        ..Default::default()
    };
    search(&state, filter, query.with_workouts).await
}

#[utoipa::path(
    get,
    path = "/api/tags/search/by-max-usages",
    tag = "Tags",
    security(("bearer_auth" = [])),
    params(MaxUsagesQuery),
    responses((status = 200, description = "Tags used at most `max_usages` times", body = Vec<TagWorkoutsResponse>))
)]
pub async fn search_by_max_usages(
    State(state): State<AppState>,
    Query(query): Query<MaxUsagesQuery>,
) -> AppResult<Json<Vec<TagWorkoutsResponse>>> {
    let filter = TagFilter {
        max_usages: Some(query.max_usages),
        ..Default::default()
    };
    search(&state, filter, query.with_workouts).await
}

/// Tag with the workouts using it
#[utoipa::path(
    get,
    path = "/api/tags/{id}",
    tag = "Tags",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = TagWorkoutsResponse),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<TagWorkoutsResponse>> {
    let detail = state.tags.detail(id).await?;
    Ok(Json(detail.into()))
}

#[utoipa::path(
    put,
    path = "/api/tags/{id}/update",
    tag = "Tags",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tag id")),
    request_body = TagNameRequest,
    responses(
        (status = 200, description = "Tag renamed", body = TagResponse),
        (status = 404, description = "Tag not found"),
        (status = 409, description = "Tag name already used")
    )
)]
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<TagNameRequest>,
) -> AppResult<Json<TagResponse>> {
    let tag = state.tags.update(id, payload.name).await?;
    Ok(Json(tag.into()))
}

#[utoipa::path(
    delete,
    path = "/api/tags/{id}/delete",
    tag = "Tags",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tag id")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.tags.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
