//! Account use cases: sign-up, sign-in, token refresh and profile.
//!
//! Sign-in never tells the caller whether the email or the password was
//! wrong; the precise reason is only logged at debug level.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{Config, INVALID_CREDENTIALS_MESSAGE, ROLE_CLIENT};
use crate::domain::{Email, NewClient, NewStaff, NewUser, StaffRole, User, UserService};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::{
    AvatarRepository, ClientRepository, StaffRepository, UserRepository,
};
use crate::infra::{JwtService, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Email and plain-text password as submitted by a client
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct StaffSignUp {
    pub credentials: Credentials,
    pub role: StaffRole,
}

/// Tokens issued after a successful sign-in
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenPair {
    /// Short-lived token sent as `Authorization: Bearer ...`
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Long-lived token exchanged for new access tokens
    pub refresh_token: String,
    /// Staff role, or `CLIENT`
    #[schema(example = "CLIENT")]
    pub role: String,
}

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: i32,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "user_3f2a9c1b")]
    pub username: String,
    pub avatar_url: Option<String>,
    pub is_staff: bool,
    #[schema(example = "CLIENT")]
    pub role: String,
}

/// Profile fields to change; `None` keeps the current value.
#[derive(Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub password: Option<String>,
    pub avatar_id: Option<i32>,
}

impl std::fmt::Debug for ProfileChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileChanges")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("avatar_id", &self.avatar_id)
            .finish()
    }
}

/// Caller identified by a valid access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub role: Option<StaffRole>,
}

impl Principal {
    pub fn is_staff(&self) -> bool {
        self.role.is_some()
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserInteractor: Send + Sync {
    /// Register a client account.
    async fn sign_up(&self, credentials: Credentials) -> AppResult<UserProfile>;

    /// Register a staff account with the given role.
    async fn sign_up_staff(&self, input: StaffSignUp) -> AppResult<UserProfile>;

    async fn sign_in(&self, credentials: Credentials) -> AppResult<TokenPair>;

    /// Like `sign_in`, but only for users with a staff row.
    async fn sign_in_staff(&self, credentials: Credentials) -> AppResult<TokenPair>;

    /// Exchange a refresh token for a new access token. The refresh token is
    /// returned unchanged.
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair>;

    /// Resolve an access token to the calling user.
    async fn authenticate(&self, access_token: &str) -> AppResult<Principal>;

    async fn profile(&self, user_id: i32) -> AppResult<UserProfile>;

    async fn update_profile(&self, user_id: i32, changes: ProfileChanges)
        -> AppResult<UserProfile>;
}

pub struct Accounts<U: UnitOfWork> {
    uow: Arc<U>,
    jwt: JwtService,
    users: UserService,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl<U: UnitOfWork> Accounts<U> {
    pub fn new(uow: Arc<U>, jwt: JwtService, config: &Config) -> Self {
        Self {
            uow,
            jwt,
            users: UserService,
            access_ttl: Duration::minutes(config.access_token_minutes),
            refresh_ttl: Duration::days(config.refresh_token_days),
        }
    }

    /// Validate the credentials of a new account and make sure the email is free.
    async fn prepare_account(&self, credentials: &Credentials) -> AppResult<NewUser> {
        let email = Email::parse(&credentials.email)?;
        if self
            .uow
            .repos()
            .users()
            .get_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::UserAlreadyExists(format!(
                "User with email {} already exists.",
                email
            )));
        }

        self.users.create_user(email.as_str(), &credentials.password)
    }

    async fn check_credentials(&self, credentials: &Credentials) -> AppResult<User> {
        let email = credentials.email.trim();
        let Some(user) = self.uow.repos().users().get_by_email(email).await? else {
            tracing::debug!(email, "Sign-in rejected: unknown email");
            return Err(invalid_credentials());
        };

        match self.users.verify_password(&user, &credentials.password) {
            Ok(true) => Ok(user),
            Ok(false) => {
                tracing::debug!(user_id = user.id, "Sign-in rejected: wrong password");
                Err(invalid_credentials())
            }
            Err(AppError::InvalidPassword(reason)) => {
                tracing::debug!(user_id = user.id, %reason, "Sign-in rejected");
                Err(invalid_credentials())
            }
            Err(e) => Err(e),
        }
    }

    async fn staff_role(&self, user_id: i32) -> AppResult<Option<StaffRole>> {
        let staff = self.uow.repos().staff().get_by_user_id(user_id).await?;
        Ok(staff.map(|s| s.role))
    }

    fn issue_tokens(&self, user_id: i32, role: Option<StaffRole>) -> AppResult<TokenPair> {
        let now = Utc::now();
        Ok(TokenPair {
            access_token: self.jwt.encode(user_id, now + self.access_ttl)?,
            refresh_token: self.jwt.encode(user_id, now + self.refresh_ttl)?,
            role: role_name(role),
        })
    }
}

fn invalid_credentials() -> AppError {
    AppError::InvalidPassword(INVALID_CREDENTIALS_MESSAGE.to_string())
}

fn role_name(role: Option<StaffRole>) -> String {
    role.map_or(ROLE_CLIENT, |r| r.as_str()).to_string()
}

fn profile_of(user: User, avatar_url: Option<String>, role: Option<StaffRole>) -> UserProfile {
    UserProfile {
        id: user.id,
        email: user.email.into_string(),
        username: user.username,
        avatar_url,
        is_staff: role.is_some(),
        role: role_name(role),
    }
}

#[async_trait]
impl<U: UnitOfWork> UserInteractor for Accounts<U> {
    async fn sign_up(&self, credentials: Credentials) -> AppResult<UserProfile> {
        let new_user = self.prepare_account(&credentials).await?;

        let user = self
            .uow
            .transaction(move |tx| async move {
                let user = tx.repos().users().add(new_user).await?;
                tx.repos()
                    .clients()
                    .add(NewClient { user_id: user.id })
                    .await?;
                Ok(user)
            })
            .await?;

        tracing::info!(user_id = user.id, "Client signed up");
        Ok(profile_of(user, None, None))
    }

    async fn sign_up_staff(&self, input: StaffSignUp) -> AppResult<UserProfile> {
        let new_user = self.prepare_account(&input.credentials).await?;
        let role = input.role;

        let user = self
            .uow
            .transaction(move |tx| async move {
                let user = tx.repos().users().add(new_user).await?;
                tx.repos()
                    .staff()
                    .add(NewStaff {
                        user_id: user.id,
                        role,
                    })
                    .await?;
                Ok(user)
            })
            .await?;

        tracing::info!(user_id = user.id, %role, "Staff signed up");
        Ok(profile_of(user, None, Some(role)))
    }

    async fn sign_in(&self, credentials: Credentials) -> AppResult<TokenPair> {
        let user = self.check_credentials(&credentials).await?;
        let role = self.staff_role(user.id).await?;

        tracing::debug!(user_id = user.id, "Signed in");
        self.issue_tokens(user.id, role)
    }

    async fn sign_in_staff(&self, credentials: Credentials) -> AppResult<TokenPair> {
        let user = self.check_credentials(&credentials).await?;
        let Some(role) = self.staff_role(user.id).await? else {
            tracing::debug!(user_id = user.id, "Staff sign-in rejected: not a staff member");
            return Err(AppError::NotAdmin);
        };

        tracing::debug!(user_id = user.id, %role, "Staff signed in");
        self.issue_tokens(user.id, Some(role))
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.jwt.decode(refresh_token).map_err(|kind| {
            tracing::debug!(%kind, "Refresh token rejected");
            AppError::InvalidCredentials
        })?;

        let user = self
            .uow
            .repos()
            .users()
            .get_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;
        let role = self.staff_role(user.id).await?;

        Ok(TokenPair {
            access_token: self.jwt.encode(user.id, Utc::now() + self.access_ttl)?,
            refresh_token: refresh_token.to_string(),
            role: role_name(role),
        })
    }

    async fn authenticate(&self, access_token: &str) -> AppResult<Principal> {
        let claims = self.jwt.decode(access_token)?;
        let user = self
            .uow
            .repos()
            .users()
            .get_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok(Principal {
            user_id: user.id,
            role: self.staff_role(user.id).await?,
        })
    }

    async fn profile(&self, user_id: i32) -> AppResult<UserProfile> {
        let repos = self.uow.repos();
        let user = repos
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let avatar_url = match user.avatar_id {
            Some(avatar_id) => repos
                .avatars()
                .get_by_id(avatar_id)
                .await?
                .map(|avatar| avatar.image_url),
            None => None,
        };
        let role = self.staff_role(user.id).await?;

        Ok(profile_of(user, avatar_url, role))
    }

    async fn update_profile(
        &self,
        user_id: i32,
        changes: ProfileChanges,
    ) -> AppResult<UserProfile> {
        let repos = self.uow.repos();
        let existing = repos
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if let Some(avatar_id) = changes.avatar_id {
            repos
                .avatars()
                .get_by_id(avatar_id)
                .await?
                .ok_or_not_found(|| format!("Avatar with id {} not found", avatar_id))?;
        }

        let updated = self.users.update_user(
            &existing,
            changes.password.as_deref(),
            changes.username,
            changes.avatar_id,
        )?;

        self.uow
            .transaction(move |tx| async move { tx.repos().users().update(&updated).await })
            .await?;

        tracing::info!(user_id, "Profile updated");
        self.profile(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Persistence;
    use crate::interactors::testing;

    async fn accounts() -> Accounts<Persistence> {
        let config = testing::config();
        Accounts::new(
            testing::persistence().await,
            JwtService::from_config(&config),
            &config,
        )
    }

    #[tokio::test]
    async fn test_sign_up_creates_client() {
        let accounts = accounts().await;

        let profile = accounts
            .sign_up(Credentials::new(" anna@example.com ", "password1"))
            .await
            .unwrap();

        assert_eq!(profile.email, "anna@example.com");
        assert!(profile.username.starts_with("user_"));
        assert!(!profile.is_staff);
        assert_eq!(profile.role, ROLE_CLIENT);

        let client = accounts
            .uow
            .repos()
            .clients()
            .get_by_user_id(profile.id)
            .await
            .unwrap();
        assert!(client.is_some());
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let accounts = accounts().await;
        accounts
            .sign_up(Credentials::new("dup@example.com", "password1"))
            .await
            .unwrap();

        let result = accounts
            .sign_up(Credentials::new("dup@example.com", "password2"))
            .await;
        assert!(matches!(result, Err(AppError::UserAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_sign_up_rejects_bad_input() {
        let accounts = accounts().await;

        let bad_email = accounts
            .sign_up(Credentials::new("not-an-email", "password1"))
            .await;
        assert!(matches!(bad_email, Err(AppError::InvalidEmail(_))));

        let weak = accounts
            .sign_up(Credentials::new("weak@example.com", "short"))
            .await;
        assert!(matches!(weak, Err(AppError::InvalidPassword(_))));
    }

    #[tokio::test]
    async fn test_sign_in_collapses_failures() {
        let accounts = accounts().await;
        accounts
            .sign_up(Credentials::new("bob@example.com", "password1"))
            .await
            .unwrap();

        let wrong_password = accounts
            .sign_in(Credentials::new("bob@example.com", "password2"))
            .await
            .unwrap_err();
        let unknown_user = accounts
            .sign_in(Credentials::new("nobody@example.com", "password1"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.code(), unknown_user.code());
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert_eq!(wrong_password.to_string(), INVALID_CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn test_sign_in_issues_tokens_for_subject() {
        let accounts = accounts().await;
        let profile = accounts
            .sign_up(Credentials::new("carl@example.com", "password1"))
            .await
            .unwrap();

        let tokens = accounts
            .sign_in(Credentials::new("carl@example.com", "password1"))
            .await
            .unwrap();

        assert_eq!(tokens.role, ROLE_CLIENT);
        let access = accounts.jwt.decode(&tokens.access_token).unwrap();
        let refresh = accounts.jwt.decode(&tokens.refresh_token).unwrap();
        assert_eq!(access.sub, profile.id);
        assert!(refresh.exp > access.exp);
    }

    #[tokio::test]
    async fn test_staff_sign_in_requires_staff_row() {
        let accounts = accounts().await;
        accounts
            .sign_up(Credentials::new("client@example.com", "password1"))
            .await
            .unwrap();
        accounts
            .sign_up_staff(StaffSignUp {
                credentials: Credentials::new("admin@example.com", "password1"),
                role: StaffRole::Admin,
            })
            .await
            .unwrap();

        let client = accounts
            .sign_in_staff(Credentials::new("client@example.com", "password1"))
            .await;
        assert!(matches!(client, Err(AppError::NotAdmin)));

        let admin = accounts
            .sign_in_staff(Credentials::new("admin@example.com", "password1"))
            .await
            .unwrap();
        assert_eq!(admin.role, "ADMIN");
    }

    #[tokio::test]
    async fn test_refresh_keeps_refresh_token() {
        let accounts = accounts().await;
        accounts
            .sign_up(Credentials::new("dora@example.com", "password1"))
            .await
            .unwrap();
        let tokens = accounts
            .sign_in(Credentials::new("dora@example.com", "password1"))
            .await
            .unwrap();

        let refreshed = accounts.refresh(&tokens.refresh_token).await.unwrap();
        assert_eq!(refreshed.refresh_token, tokens.refresh_token);
        assert!(accounts.jwt.decode(&refreshed.access_token).is_ok());
    }

    #[tokio::test]
    async fn test_refresh_hides_token_failure_kind() {
        let accounts = accounts().await;

        let malformed = accounts.refresh("garbage").await;
        assert!(matches!(malformed, Err(AppError::InvalidCredentials)));

        let expired_token = accounts
            .jwt
            .encode(1, Utc::now() - Duration::minutes(1))
            .unwrap();
        let expired = accounts.refresh(&expired_token).await;
        assert!(matches!(expired, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_keeps_token_failure_kind() {
        let accounts = accounts().await;
        let expired_token = accounts
            .jwt
            .encode(1, Utc::now() - Duration::minutes(1))
            .unwrap();

        let result = accounts.authenticate(&expired_token).await;
        assert!(matches!(
            result,
            Err(AppError::Token(crate::errors::TokenError::Expired))
        ));
    }

    #[tokio::test]
    async fn test_update_profile_requires_existing_avatar() {
        let accounts = accounts().await;
        let profile = accounts
            .sign_up(Credentials::new("eve@example.com", "password1"))
            .await
            .unwrap();

        let result = accounts
            .update_profile(
                profile.id,
                ProfileChanges {
                    avatar_id: Some(999),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let updated = accounts
            .update_profile(
                profile.id,
                ProfileChanges {
                    username: Some("eve".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.username, "eve");
        assert_eq!(updated.email, "eve@example.com");
    }
}
