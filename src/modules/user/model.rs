use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{modules::user::schema::UserEntity, utils::EMAIL_REGEX};

#[derive(Deserialize)]
pub struct SignUpModel {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Presence is checked before format, so each payload yields exactly one error.
impl Validate for SignUpModel {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.email.is_empty() || self.password.is_empty() {
            errors.add("email", field_error("required", "Email and password are required"));
        } else if !EMAIL_REGEX.is_match(&self.email) {
            errors.add("email", field_error("email", "Invalid email format"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct SignInModel {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct RefreshTokenModel {
    #[serde(default)]
    #[validate(length(min = 1, message = "Refresh token cannot be empty"))]
    pub refresh: String,
}

#[derive(Deserialize, Validate)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<String>,
}

pub struct InsertUser {
    pub email: String,
    pub hash_password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Directory lookup: an `@` in the query switches to exact email matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Email(String),
    Name(String),
}

impl UserFilter {
    pub fn from_query(query: &str) -> Self {
        if query.contains('@') {
            UserFilter::Email(query.to_string())
        } else {
            UserFilter::Name(query.to_string())
        }
    }
}

/// A missing or non-numeric page is the first page; an out-of-range page is the last one.
pub fn resolve_page(requested: Option<&str>, total: i64, per_page: i64) -> i64 {
    let last_page = ((total + per_page - 1) / per_page).max(1);
    match requested.and_then(|p| p.trim().parse::<i64>().ok()) {
        None => 1,
        Some(page) if page < 1 || page > last_page => last_page,
        Some(page) => page,
    }
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            id: entity.id,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
        }
    }
}
