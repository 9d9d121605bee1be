use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Comment entity - a reader's note on a post. Listed newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub body: String,
    pub date_posted: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment. The body must not be blank.
    pub fn new(user_id: Uuid, post_id: Uuid, body: &str) -> Result<Self, DomainError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(DomainError::Validation(
                "comment_body: This field is required.".into(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            post_id,
            body: body.to_string(),
            date_posted: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_body_rejected() {
        let result = Comment::new(Uuid::new_v4(), Uuid::new_v4(), "   \n");
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_body_trimmed() {
        let comment = Comment::new(Uuid::new_v4(), Uuid::new_v4(), "  nice post ").unwrap();
        assert_eq!(comment.body, "nice post");
    }
}
