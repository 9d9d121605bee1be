//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, SelectTwo,
};
use uuid::Uuid;

use quill_core::domain::{AuthoredPost, Comment, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, PostRepository, UserRepository};
use quill_core::query::{Page, PageRequest, PostFilter, month_range};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }
}

/// Escape LIKE wildcards so user input only ever matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `LOWER(col) LIKE pattern`, pattern already lower-cased.
fn lower_like<C: IntoColumnRef>(col: C, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Approved posts joined with their authors, narrowed by `filter`.
fn approved_posts(filter: &PostFilter) -> SelectTwo<PostEntity, UserEntity> {
    let query = PostEntity::find()
        .find_also_related(UserEntity)
        .filter(post::Column::IsApproved.eq(true));

    let query = match filter {
        PostFilter::All => query,
        PostFilter::Search(term) => {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            query.filter(
                Condition::any()
                    .add(lower_like((PostEntity, post::Column::Title), &pattern))
                    .add(lower_like((PostEntity, post::Column::Content), &pattern))
                    .add(lower_like((UserEntity, user::Column::Username), &pattern)),
            )
        }
        PostFilter::Author(author_id) => query.filter(post::Column::AuthorId.eq(*author_id)),
        PostFilter::Month { year, month } => match month_range(*year, *month) {
            Some((start, end)) => query
                .filter(post::Column::DatePosted.gte(start))
                .filter(post::Column::DatePosted.lt(end)),
            // an impossible month selects nothing
            None => query.filter(post::Column::Id.is_null()),
        },
    };

    query
        .order_by_desc(post::Column::DatePosted)
        .order_by_asc(post::Column::Id)
}

fn authored((post, author): (post::Model, Option<user::Model>)) -> AuthoredPost {
    AuthoredPost {
        post: post.into(),
        author: author.map(|u| u.username).unwrap_or_default(),
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_approved(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<AuthoredPost>, RepoError> {
        tracing::debug!(?filter, page = page.number, "Listing approved posts");

        let paginator = approved_posts(filter).paginate(&self.db, page.size);
        let total_items = paginator.num_items().await.map_err(repo_err)?;
        let rows = paginator
            .fetch_page(page.number.saturating_sub(1))
            .await
            .map_err(repo_err)?;

        Ok(Page::new(
            rows.into_iter().map(authored).collect(),
            page,
            total_items,
        ))
    }

    async fn find_authored(&self, id: Uuid) -> Result<Option<AuthoredPost>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(authored))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Title.eq(title))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_pending(&self) -> Result<Vec<AuthoredPost>, RepoError> {
        let result = PostEntity::find()
            .find_also_related(UserEntity)
            .filter(post::Column::IsApproved.eq(false))
            .order_by_desc(post::Column::DatePosted)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(authored).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::DatePosted)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::{PostFilter, approved_posts, escape_like};

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_listing_order_breaks_date_ties_by_id() {
        for filter in [PostFilter::All, PostFilter::Search("rust".into())] {
            let sql = approved_posts(&filter).build(DbBackend::Postgres).sql;
            assert!(
                sql.ends_with(r#"ORDER BY "posts"."date_posted" DESC, "posts"."id" ASC"#),
                "{sql}"
            );
        }
    }
}
