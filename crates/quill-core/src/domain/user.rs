use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::ports::STAFF_ROLE;

pub const MAX_USERNAME_LEN: usize = 150;

/// User entity - an account that can author posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Create a new regular (non-staff) user with generated ID and timestamp.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            is_staff: false,
            date_joined: Utc::now(),
        }
    }

    /// Roles carried in issued tokens.
    pub fn roles(&self) -> Vec<String> {
        let mut roles = vec!["user".to_string()];
        if self.is_staff {
            roles.push(STAFF_ROLE.to_string());
        }
        roles
    }

    /// Letters, digits and `@.+-_`, at most 150 characters.
    pub fn validate_username(username: &str) -> Result<(), DomainError> {
        if username.is_empty() {
            return Err(DomainError::Validation("username: This field is required.".into()));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(DomainError::Validation(format!(
                "username: Ensure this value has at most {MAX_USERNAME_LEN} characters."
            )));
        }
        let valid = username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
        if !valid {
            return Err(DomainError::Validation(
                "username: Enter a valid username.".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_role() {
        let mut user = User::new("ada".into(), "ada@example.com".into(), "hash".into());
        assert_eq!(user.roles(), vec!["user".to_string()]);

        user.is_staff = true;
        assert!(user.roles().contains(&STAFF_ROLE.to_string()));
    }

    #[test]
    fn test_validate_username() {
        assert!(User::validate_username("ada.lovelace+1").is_ok());
        assert!(User::validate_username("").is_err());
        assert!(User::validate_username("has space").is_err());
        assert!(User::validate_username(&"a".repeat(151)).is_err());
    }
}
