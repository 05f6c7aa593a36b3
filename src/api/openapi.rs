//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    avatar_handler, style_handler, tag_handler, user_handler, workout_handler,
};
use crate::api::schemas::{
    AvatarResponse, ImageForm, StyleDetailResponse, StyleForm, StyleResponse, StyleUpdateForm,
    TagCreatedResponse, TagPage, TagResponse, TagWorkoutsResponse, ViewsResponse,
    WorkoutCreatedResponse, WorkoutForm, WorkoutListItem, WorkoutResponse, WorkoutSummary,
    WorkoutUpdateForm,
};
use crate::domain::{Level, StaffRole};
use crate::interactors::{TokenPair, UserProfile};
use crate::types::MessageResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Workout Catalog",
        version = "0.1.0",
        description = "Dance workouts organised by style and tag, with client and staff accounts",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        user_handler::sign_up,
        user_handler::sign_up_staff,
        user_handler::sign_in,
        user_handler::sign_in_staff,
        user_handler::refresh_token,
        user_handler::get_current_user,
        user_handler::update_current_user,
        avatar_handler::create_avatar,
        avatar_handler::list_avatars,
        avatar_handler::get_avatar,
        avatar_handler::update_avatar,
        avatar_handler::delete_avatar,
        style_handler::create_style,
        style_handler::list_styles,
        style_handler::get_style,
        style_handler::get_style_detail,
        style_handler::update_style,
        style_handler::delete_style,
        tag_handler::create_tag,
        tag_handler::list_tags,
        tag_handler::popular_tags,
        tag_handler::search_by_name,
        tag_handler::search_by_min_usages,
        tag_handler::search_by_max_usages,
        tag_handler::get_tag,
        tag_handler::update_tag,
        tag_handler::delete_tag,
        workout_handler::create_workout,
        workout_handler::list_workouts,
        workout_handler::get_workout,
        workout_handler::update_workout,
        workout_handler::increment_views,
        workout_handler::delete_workout,
        workout_handler::add_tags,
        workout_handler::remove_tag,
    ),
    components(
        schemas(
            Level,
            StaffRole,
            TokenPair,
            UserProfile,
            MessageResponse,
            user_handler::CredentialsRequest,
            user_handler::StaffSignUpRequest,
            user_handler::RefreshTokenRequest,
            user_handler::UpdateProfileRequest,
            tag_handler::TagNameRequest,
            workout_handler::AddTagsRequest,
            workout_handler::WorkoutViewRequest,
            AvatarResponse,
            StyleResponse,
            StyleDetailResponse,
            TagResponse,
            TagPage,
            TagWorkoutsResponse,
            WorkoutSummary,
            WorkoutResponse,
            WorkoutListItem,
            WorkoutCreatedResponse,
            TagCreatedResponse,
            ViewsResponse,
            ImageForm,
            StyleForm,
            StyleUpdateForm,
            WorkoutForm,
            WorkoutUpdateForm,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Accounts, sign-in and profile"),
        (name = "Avatars", description = "Profile pictures"),
        (name = "Styles", description = "Dance styles"),
        (name = "Tags", description = "Workout tags and their usage"),
        (name = "Workouts", description = "Workouts, their tags and views")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /api/users/sign-in"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/users/sign-in",
            "/api/avatars/{id}",
            "/api/styles/{id}/detail",
            "/api/tags/search/by-name",
            "/api/workouts/{id}/delete/{tag_id}/tag",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }

    #[test]
    fn test_uploads_are_documented_as_multipart() {
        use utoipa::openapi::PathItemType;

        let doc = ApiDoc::openapi();
        for (path, method) in [
            ("/api/avatars/create", PathItemType::Post),
            ("/api/avatars/{id}/update", PathItemType::Put),
            ("/api/styles/create", PathItemType::Post),
            ("/api/styles/{id}/update", PathItemType::Put),
            ("/api/workouts/create", PathItemType::Post),
            ("/api/workouts/{id}/update", PathItemType::Put),
        ] {
            let body = doc.paths.paths[path].operations[&method]
                .request_body
                .as_ref()
                .unwrap_or_else(|| panic!("{} has no request body", path));
            assert!(
                body.content.contains_key("multipart/form-data"),
                "{} is not multipart",
                path
            );
        }
        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("WorkoutForm"));
    }
}
