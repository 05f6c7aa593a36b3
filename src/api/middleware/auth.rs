//! Bearer token authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::api::AppState;
use crate::domain::StaffRole;
use crate::errors::{AppError, TokenError};

/// Authenticated user, inserted into request extensions by the middleware
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    /// `None` for clients
    pub role: Option<StaffRole>,
}

impl CurrentUser {
    /// ADMIN and MANAGER may both manage the catalog.
    pub fn is_staff(&self) -> bool {
        matches!(self.role, Some(StaffRole::Admin | StaffRole::Manager))
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    if !headers.contains_key(AUTHORIZATION) {
        return Err(TokenError::Missing.into());
    }

    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_string())
        .ok_or(AppError::Token(TokenError::Malformed))
}

async fn authenticate(state: &AppState, token: &str) -> Result<CurrentUser, AppError> {
    let principal = state.users.authenticate(token).await?;
    Ok(CurrentUser {
        id: principal.user_id,
        role: principal.role,
    })
}

/// Require a valid access token.
///
/// Extracts and validates the bearer token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let current_user = authenticate(&state, &token).await?;
    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Require a valid access token that belongs to a staff member.
pub async fn admin_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let current_user = authenticate(&state, &token).await?;
    require_staff(&current_user)?;
    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Require staff role, returns Forbidden error otherwise.
pub fn require_staff(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_staff() {
        Ok(())
    } else {
        tracing::debug!(user_id = user.id, "Non-staff user on a staff route");
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_errors() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AppError::Token(TokenError::Missing))
        ));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert!(matches!(
            bearer_token(&headers),
            Err(AppError::Token(TokenError::Malformed))
        ));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_staff_roles() {
        let client = CurrentUser { id: 1, role: None };
        let admin = CurrentUser {
            id: 2,
            role: Some(StaffRole::Admin),
        };
        let manager = CurrentUser {
            id: 3,
            role: Some(StaffRole::Manager),
        };

        assert!(matches!(require_staff(&client), Err(AppError::Forbidden)));
        assert!(require_staff(&admin).is_ok());
        assert!(require_staff(&manager).is_ok());
    }
}
