//! Comment submission and removal.

use actix_web::{HttpResponse, http::header, web};
use uuid::Uuid;

use quill_core::access::can_view;
use quill_core::domain::Comment;
use quill_core::error::DomainError;
use quill_core::ports::BaseRepository;
use quill_shared::dto::CommentForm;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn back_to_post(post_id: Uuid) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, format!("/post/{post_id}/")))
        .finish()
}

/// POST /post/{id}/
///
/// With comments disabled this only bounces back to the post.
pub async fn submit(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: Option<web::Json<CommentForm>>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .filter(|post| can_view(Some(&identity.actor()), post))
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    if !state.comments_enabled {
        return Ok(back_to_post(post.id));
    }

    let body = body.map(|b| b.into_inner().comment_body).unwrap_or_default();
    let comment = Comment::new(identity.user_id, post.id, &body)?;
    let comment = state.comments.insert(comment).await?;
    tracing::debug!(comment_id = %comment.id, post_id = %post.id, "Comment added");

    Ok(back_to_post(post.id))
}

/// POST /comment/{id}/delete/
pub async fn delete(
    identity: Result<Identity, AppError>,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !state.comments_enabled {
        return Err(DomainError::not_found("comment", id).into());
    }

    let identity = identity?;
    let comment = state
        .comments
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("comment", id))?;

    identity.actor().authorize_comment_delete(&comment)?;
    state.comments.delete(id).await?;
    tracing::info!(comment_id = %id, by = %identity.username, "Comment deleted");

    Ok(back_to_post(comment.post_id))
}
