//! Application route configuration.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    avatar_admin_routes, avatar_routes, style_admin_routes, style_routes, tag_admin_routes,
    tag_routes, user_public_routes, user_routes, workout_admin_routes, workout_routes,
};
use super::middleware::{admin_middleware, auth_middleware};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::{Config, MEDIA_URL_PATH};

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let api = Router::new()
        .nest(
            "/users",
            user_public_routes().merge(user_routes().route_layer(
                middleware::from_fn_with_state(state.clone(), auth_middleware),
            )),
        )
        .nest("/avatars", guarded(&state, avatar_routes(), avatar_admin_routes()))
        .nest("/styles", guarded(&state, style_routes(), style_admin_routes()))
        .nest("/tags", guarded(&state, tag_routes(), tag_admin_routes()))
        .nest("/workouts", guarded(&state, workout_routes(), workout_admin_routes()));

    Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .nest_service(MEDIA_URL_PATH, ServeDir::new(&config.media_dir))
        // Global middleware
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Signed-in users reach `open`, staff also reach `admin`.
fn guarded(
    state: &AppState,
    open: Router<AppState>,
    admin: Router<AppState>,
) -> Router<AppState> {
    open.route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ))
    .merge(admin.route_layer(middleware::from_fn_with_state(
        state.clone(),
        admin_middleware,
    )))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            tracing::warn!(
                frontend_url = %config.frontend_url,
                "Invalid frontend URL, cross-origin requests are refused"
            );
            cors
        }
    }
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.database.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "healthy",
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    database: "unhealthy",
                }),
            )
        }
    }
}
