//! Account handlers: sign-up, sign-in, token refresh and profile.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::StaffRole;
use crate::errors::AppResult;
use crate::interactors::{Credentials, ProfileChanges, StaffSignUp, TokenPair, UserProfile};
use crate::types::Created;

/// Client registration / sign-in request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CredentialsRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// At least 8 characters with a lowercase letter and a digit
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "password1", min_length = 8)]
    pub password: String,
}

impl From<CredentialsRequest> for Credentials {
    fn from(request: CredentialsRequest) -> Self {
        Credentials::new(request.email, request.password)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StaffSignUpRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub role: StaffRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Only supplied fields change
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters"))]
    pub username: Option<String>,
    pub password: Option<String>,
    pub avatar_id: Option<i32>,
}

/// Routes open to anyone
pub fn user_public_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-up/staff", post(sign_up_staff))
        .route("/sign-in", post(sign_in))
        .route("/sign-in/staff", post(sign_in_staff))
        .route("/refresh-token", post(refresh_token))
}

/// Routes for the signed-in user
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user).put(update_current_user))
}

/// Register a client account
#[utoipa::path(
    post,
    path = "/api/users/sign-up",
    tag = "Users",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 400, description = "Password does not satisfy the rules"),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Invalid email")
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CredentialsRequest>,
) -> AppResult<Created<UserProfile>> {
    let profile = state.users.sign_up(payload.into()).await?;
    Ok(Created(profile))
}

/// Register a staff account
#[utoipa::path(
    post,
    path = "/api/users/sign-up/staff",
    tag = "Users",
    request_body = StaffSignUpRequest,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn sign_up_staff(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StaffSignUpRequest>,
) -> AppResult<Created<UserProfile>> {
    let profile = state
        .users
        .sign_up_staff(StaffSignUp {
            credentials: Credentials::new(payload.email, payload.password),
            role: payload.role,
        })
        .await?;
    Ok(Created(profile))
}

/// Sign in and receive access and refresh tokens
#[utoipa::path(
    post,
    path = "/api/users/sign-in",
    tag = "Users",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenPair),
        (status = 400, description = "Invalid credentials")
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CredentialsRequest>,
) -> AppResult<Json<TokenPair>> {
    let tokens = state.users.sign_in(payload.into()).await?;
    Ok(Json(tokens))
}

/// Sign in to the staff back office
#[utoipa::path(
    post,
    path = "/api/users/sign-in/staff",
    tag = "Users",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenPair),
        (status = 400, description = "Invalid credentials"),
        (status = 403, description = "Not a staff member")
    )
)]
pub async fn sign_in_staff(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CredentialsRequest>,
) -> AppResult<Json<TokenPair>> {
    let tokens = state.users.sign_in_staff(payload.into()).await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/api/users/refresh-token",
    tag = "Users",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token", body = TokenPair),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> AppResult<Json<TokenPair>> {
    let tokens = state.users.refresh(&payload.refresh_token).await?;
    Ok(Json(tokens))
}

/// Get the signed-in user's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserProfile>> {
    let profile = state.users.profile(current_user.id).await?;
    Ok(Json(profile))
}

/// Update the signed-in user's profile
#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 404, description = "Avatar not found"),
        (status = 409, description = "Username taken")
    )
)]
pub async fn update_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    let changes = ProfileChanges {
        username: payload.username,
        password: payload.password,
        avatar_id: payload.avatar_id,
    };
    let profile = state.users.update_profile(current_user.id, changes).await?;
    Ok(Json(profile))
}
