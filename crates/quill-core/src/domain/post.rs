use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_SLUG_LEN: usize = 100;

/// Post entity - a blog post awaiting or holding publication approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub image: Option<String>,
    pub date_posted: DateTime<Utc>,
    pub is_approved: bool,
}

/// Post together with its author's username, as shown in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthoredPost {
    pub post: Post,
    pub author: String,
}

/// User-editable fields of a post, as submitted on create or update.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    pub image: Option<String>,
}

impl PostDraft {
    fn cleaned_title(&self) -> Result<String, DomainError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::Validation("title: This field is required.".into()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::Validation(format!(
                "title: Ensure this value has at most {MAX_TITLE_LEN} characters."
            )));
        }
        Ok(title.to_string())
    }

    fn cleaned_content(&self) -> Result<String, DomainError> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation(
                "content: This field is required.".into(),
            ));
        }
        Ok(content.to_string())
    }

    /// `None` when the draft leaves the slug blank.
    fn cleaned_slug(&self) -> Result<Option<String>, DomainError> {
        let Some(slug) = self.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        if slug.chars().count() > MAX_SLUG_LEN {
            return Err(DomainError::Validation(format!(
                "slug: Ensure this value has at most {MAX_SLUG_LEN} characters."
            )));
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::Validation(
                "slug: Enter a valid slug consisting of letters, numbers, underscores or hyphens."
                    .into(),
            ));
        }
        Ok(Some(slug.to_string()))
    }

    fn cleaned_image(&self) -> Option<String> {
        self.image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }
}

impl Post {
    /// Create a new, unapproved post. A blank slug defaults to a random UUID.
    pub fn new(author_id: Uuid, draft: PostDraft) -> Result<Self, DomainError> {
        let title = draft.cleaned_title()?;
        let content = draft.cleaned_content()?;
        let slug = draft
            .cleaned_slug()?
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            content,
            image: draft.cleaned_image(),
            date_posted: Utc::now(),
            is_approved: false,
        })
    }

    /// Apply an edit. Every edit sends the post back to review.
    ///
    /// A blank slug keeps the current one.
    pub fn apply_edit(&mut self, draft: PostDraft) -> Result<(), DomainError> {
        let title = draft.cleaned_title()?;
        let content = draft.cleaned_content()?;
        let slug = draft.cleaned_slug()?;

        self.title = title;
        self.content = content;
        if let Some(slug) = slug {
            self.slug = slug;
        }
        self.image = draft.cleaned_image();
        self.is_approved = false;
        Ok(())
    }

    pub fn approve(&mut self) {
        self.is_approved = true;
    }

    pub fn revoke_approval(&mut self) {
        self.is_approved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, content: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_post_is_unapproved_with_uuid_slug() {
        let post = Post::new(Uuid::new_v4(), draft("Hello", "World")).unwrap();

        assert!(!post.is_approved);
        assert!(Uuid::parse_str(&post.slug).is_ok());
        assert_eq!(post.image, None);
    }

    #[test]
    fn test_new_post_keeps_given_slug() {
        let mut d = draft("Hello", "World");
        d.slug = Some(" hello-world ".into());

        let post = Post::new(Uuid::new_v4(), d).unwrap();
        assert_eq!(post.slug, "hello-world");
    }

    #[test]
    fn test_new_post_rejects_blank_fields() {
        assert!(matches!(
            Post::new(Uuid::new_v4(), draft("  ", "body")),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Post::new(Uuid::new_v4(), draft("Title", "")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_long_title_and_bad_slug() {
        assert!(Post::new(Uuid::new_v4(), draft(&"x".repeat(101), "body")).is_err());

        let mut d = draft("Title", "body");
        d.slug = Some("not a slug!".into());
        assert!(Post::new(Uuid::new_v4(), d).is_err());
    }

    #[test]
    fn test_edit_resets_approval() {
        let mut post = Post::new(Uuid::new_v4(), draft("Hello", "World")).unwrap();
        post.approve();
        assert!(post.is_approved);

        post.apply_edit(draft("Hello again", "World")).unwrap();
        assert!(!post.is_approved);
        assert_eq!(post.title, "Hello again");

        // unapproved stays unapproved
        post.apply_edit(draft("Hello", "World")).unwrap();
        assert!(!post.is_approved);
    }

    #[test]
    fn test_edit_with_blank_slug_keeps_slug() {
        let mut post = Post::new(Uuid::new_v4(), draft("Hello", "World")).unwrap();
        let slug = post.slug.clone();

        post.apply_edit(draft("Hello", "Changed")).unwrap();
        assert_eq!(post.slug, slug);
    }

    #[test]
    fn test_invalid_edit_leaves_post_untouched() {
        let mut post = Post::new(Uuid::new_v4(), draft("Hello", "World")).unwrap();
        post.approve();

        assert!(post.apply_edit(draft("", "World")).is_err());
        assert!(post.is_approved);
        assert_eq!(post.title, "Hello");
    }
}
