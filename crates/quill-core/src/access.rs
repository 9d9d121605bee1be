//! Access rules for changing and viewing posts and comments.
//!
//! Changes are allowed to the owner of the record or to any staff user.
//! Approval itself is never granted here; only the administrative console
//! flips a post to approved.

use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::error::DomainError;

/// The authenticated user making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub is_staff: bool,
}

impl Actor {
    pub fn new(user_id: Uuid, is_staff: bool) -> Self {
        Self { user_id, is_staff }
    }

    fn owns_or_staff(&self, owner: Uuid) -> bool {
        self.user_id == owner || self.is_staff
    }

    /// Update or delete a post.
    pub fn authorize_post_change(&self, post: &Post) -> Result<(), DomainError> {
        if self.owns_or_staff(post.author_id) {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }

    pub fn authorize_comment_delete(&self, comment: &Comment) -> Result<(), DomainError> {
        if self.owns_or_staff(comment.user_id) {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }
}

/// Approved posts are public; pending ones are visible to their author and staff.
pub fn can_view(actor: Option<&Actor>, post: &Post) -> bool {
    post.is_approved || actor.is_some_and(|a| a.owns_or_staff(post.author_id))
}
