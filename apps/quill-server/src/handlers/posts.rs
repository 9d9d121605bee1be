//! Post listings, detail and the author/staff editing flow.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::access::can_view;
use quill_core::domain::{AuthoredPost, Comment, Post, PostDraft};
use quill_core::error::DomainError;
use quill_core::ports::BaseRepository;
use quill_core::query::{Page, PageRequest, PostFilter};
use quill_shared::ApiResponse;
use quill_shared::dto::{
    CommentResponse, PageQuery, PageResponse, PostDetailResponse, PostForm, PostResponse,
    SearchQuery,
};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const CREATED: &str =
    "Your Post is Created successfully, it will be added to Homepage after approval";
const UPDATED: &str =
    "Your Post is Updated successfully, it will be added to Homepage after approval";
const DELETED: &str = "Your Post is Deleted successfully";

fn post_response(authored: AuthoredPost) -> PostResponse {
    let AuthoredPost { post, author } = authored;
    PostResponse {
        id: post.id.to_string(),
        title: post.title,
        slug: post.slug,
        content: post.content,
        image: post.image,
        author,
        date_posted: post.date_posted.to_rfc3339(),
        is_approved: post.is_approved,
    }
}

fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id.to_string(),
        user_id: comment.user_id.to_string(),
        comment_body: comment.body,
        date_posted: comment.date_posted.to_rfc3339(),
    }
}

fn page_response(page: Page<AuthoredPost>) -> PageResponse<PostResponse> {
    PageResponse {
        page: page.number,
        page_size: page.size,
        total_items: page.total_items,
        total_pages: page.total_pages(),
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        items: page.map(post_response).items,
    }
}

fn draft(form: PostForm) -> PostDraft {
    PostDraft {
        title: form.title,
        slug: form.slug,
        content: form.content,
        image: form.image,
    }
}

async fn listing(
    state: &AppState,
    filter: PostFilter,
    page: Option<&str>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::parse(page)?;
    let page = state
        .posts
        .find_approved(&filter, request)
        .await?
        .ensure_in_range()?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(page_response(page))))
}

/// GET /
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    listing(&state, PostFilter::All, query.page.as_deref()).await
}

/// GET /search/?search=<q>
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let filter = PostFilter::search(query.search.as_deref());
    listing(&state, filter, query.page.as_deref()).await
}

/// GET /post/user/{username}/
pub async fn by_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| DomainError::not_found("user", &username))?;

    listing(&state, PostFilter::Author(author.id), query.page.as_deref()).await
}

/// GET /post/date/{year}/{month}/
pub async fn by_date(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32)>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (year, month) = path.into_inner();
    let filter = PostFilter::by_month(year, month).map_err(|e| match e {
        DomainError::Validation(msg) => AppError::BadRequest(msg),
        other => other.into(),
    })?;

    listing(&state, filter, query.page.as_deref()).await
}

/// GET /post/{id}/
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let authored = state
        .posts
        .find_authored(id)
        .await?
        .filter(|a| can_view(identity.actor().as_ref(), &a.post))
        .ok_or_else(|| DomainError::not_found("post", id))?;

    let comments = if state.comments_enabled {
        let comments = state.comments.find_by_post(id).await?;
        Some(comments.into_iter().map(comment_response).collect())
    } else {
        None
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDetailResponse {
        post: post_response(authored),
        comments,
    })))
}

/// Title and slug must be unique among other posts.
async fn ensure_unique(state: &AppState, post: &Post) -> AppResult<()> {
    let mut errors = Vec::new();

    if let Some(other) = state.posts.find_by_title(&post.title).await? {
        if other.id != post.id {
            errors.push("title: Post with this Title already exists.".to_string());
        }
    }
    if let Some(other) = state.posts.find_by_slug(&post.slug).await? {
        if other.id != post.id {
            errors.push("slug: Post with this Slug already exists.".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// POST /post/new/
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let post = Post::new(identity.user_id, draft(body.into_inner()))?;
    ensure_unique(&state, &post).await?;

    let post = state.posts.insert(post).await?;
    tracing::info!(post_id = %post.id, author = %identity.username, "Post submitted for approval");

    let response = post_response(AuthoredPost {
        post,
        author: identity.username,
    });
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(response, CREATED)))
}

/// PUT|POST /post/{id}/update/
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let AuthoredPost { mut post, author } = state
        .posts
        .find_authored(id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", id))?;

    identity.actor().authorize_post_change(&post)?;
    post.apply_edit(draft(body.into_inner()))?;
    ensure_unique(&state, &post).await?;

    let post = state.posts.update(post).await?;
    tracing::info!(post_id = %post.id, editor = %identity.username, "Post edited, approval reset");

    let response = post_response(AuthoredPost { post, author });
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(response, UPDATED)))
}

/// DELETE|POST /post/{id}/delete/
pub async fn delete(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", id))?;

    identity.actor().authorize_post_change(&post)?;
    state.posts.delete(id).await?;
    tracing::info!(post_id = %id, by = %identity.username, "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(DELETED)))
}
