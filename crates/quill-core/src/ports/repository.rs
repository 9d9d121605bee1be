use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AuthoredPost, Comment, Post, User};
use crate::error::RepoError;
use crate::query::{Page, PageRequest, PostFilter};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, cascading to the rows that reference it.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Exact, case-sensitive username lookup.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository: uniqueness lookups plus the public listings.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// One page of approved posts matching `filter`, newest first.
    async fn find_approved(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<AuthoredPost>, RepoError>;

    /// A post of any approval state, with its author's username.
    async fn find_authored(&self, id: Uuid) -> Result<Option<AuthoredPost>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    async fn find_by_title(&self, title: &str) -> Result<Option<Post>, RepoError>;

    /// Posts awaiting approval, newest first.
    async fn find_pending(&self) -> Result<Vec<AuthoredPost>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post, newest first.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}
