//! User domain entity.

use crate::domain::value_objects::{Email, Password};

/// User that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password: Password,
    pub username: String,
    pub avatar_id: Option<i32>,
}

/// Persisted user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub email: Email,
    pub password: Password,
    pub username: String,
    pub avatar_id: Option<i32>,
}
