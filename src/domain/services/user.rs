use uuid::Uuid;

use crate::config::USERNAME_PREFIX;
use crate::domain::entities::{NewUser, User};
use crate::domain::value_objects::{Email, Password};
use crate::errors::AppResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct UserService;

impl UserService {
    /// Validate credentials and build an unsaved user with a generated username.
    pub fn create_user(&self, email: &str, password: &str) -> AppResult<NewUser> {
        let email = Email::parse(email)?;
        let password = Password::new(password)?;

        Ok(NewUser {
            email,
            password,
            username: generate_username(),
            avatar_id: None,
        })
    }

    /// Return a copy of `existing` with the supplied fields replaced.
    pub fn update_user(
        &self,
        existing: &User,
        password: Option<&str>,
        username: Option<String>,
        avatar_id: Option<i32>,
    ) -> AppResult<User> {
        let mut user = existing.clone();
        if let Some(password) = password {
            user.password = Password::new(password)?;
        }
        if let Some(username) = username {
            user.username = username;
        }
        if let Some(avatar_id) = avatar_id {
            user.avatar_id = Some(avatar_id);
        }
        Ok(user)
    }

    pub fn verify_password(&self, user: &User, plain_text: &str) -> AppResult<bool> {
        user.password.verify(plain_text)
    }
}

fn generate_username() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}{}", USERNAME_PREFIX, &id[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    fn stored_user() -> User {
        User {
            id: 7,
            email: Email::parse("member@example.com").unwrap(),
            password: Password::new("original1").unwrap(),
            username: "member".to_string(),
            avatar_id: None,
        }
    }

    #[test]
    fn test_create_user_hashes_and_names() {
        let user = UserService.create_user("member@example.com", "password1").unwrap();

        assert_eq!(user.email.as_str(), "member@example.com");
        assert_ne!(user.password.as_str(), "password1");
        assert!(user.username.starts_with("user_"));
        assert_eq!(user.username.len(), "user_".len() + 8);
    }

    #[test]
    fn test_create_user_rejects_bad_input() {
        assert!(matches!(
            UserService.create_user("not-an-email", "password1"),
            Err(AppError::InvalidEmail(_))
        ));
        assert!(matches!(
            UserService.create_user("member@example.com", "short"),
            Err(AppError::InvalidPassword(_))
        ));
    }

    #[test]
    fn test_update_user_only_touches_supplied_fields() {
        let existing = stored_user();

        let renamed = UserService
            .update_user(&existing, None, Some("dancer".into()), None)
            .unwrap();
        assert_eq!(renamed.username, "dancer");
        assert_eq!(renamed.password, existing.password);
        assert_eq!(renamed.avatar_id, None);

        let repassworded = UserService
            .update_user(&existing, Some("changed12"), None, Some(3))
            .unwrap();
        assert_eq!(repassworded.username, "member");
        assert_eq!(repassworded.avatar_id, Some(3));
        assert!(repassworded.password.verify("changed12").unwrap());
    }
}
