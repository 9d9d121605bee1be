//! Moderation: list pending posts and flip approval.

use anyhow::{Context, Result, bail};
use uuid::Uuid;

use quill_core::domain::{AuthoredPost, Post};
use quill_core::ports::{BaseRepository, PostRepository};

/// One line per post for terminal listings.
pub fn describe(post: &Post, author: &str) -> String {
    format!(
        "{}  {}  {:<24} by {} ({})",
        post.id,
        post.date_posted.format("%Y-%m-%d %H:%M"),
        post.title,
        author,
        post.slug
    )
}

pub async fn pending(posts: &dyn PostRepository) -> Result<Vec<AuthoredPost>> {
    posts
        .find_pending()
        .await
        .context("Failed to load pending posts")
}

/// Look a post up by id, falling back to its slug.
async fn resolve(posts: &dyn PostRepository, reference: &str) -> Result<Post> {
    let found = match Uuid::parse_str(reference) {
        Ok(id) => posts.find_by_id(id).await?,
        Err(_) => None,
    };
    let found = match found {
        Some(post) => Some(post),
        None => posts.find_by_slug(reference).await?,
    };

    match found {
        Some(post) => Ok(post),
        None => bail!("No post with id or slug '{reference}'"),
    }
}

pub async fn set_approval(
    posts: &dyn PostRepository,
    reference: &str,
    approved: bool,
) -> Result<Post> {
    let mut post = resolve(posts, reference).await?;
    if post.is_approved == approved {
        tracing::info!(post_id = %post.id, approved, "Approval unchanged");
        return Ok(post);
    }

    if approved {
        post.approve();
    } else {
        post.revoke_approval();
    }

    let post = posts
        .update(post)
        .await
        .with_context(|| format!("Failed to update post '{reference}'"))?;
    tracing::info!(post_id = %post.id, approved, "Approval changed");
    Ok(post)
}
