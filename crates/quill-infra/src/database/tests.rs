#[cfg(test)]
mod tests {
    use crate::database::entity::{comment, post, user};
    use crate::database::postgres_repo::{
        PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository,
    };
    use quill_core::domain::{Post, PostDraft, User};
    use quill_core::error::RepoError;
    use quill_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn post_model(title: &str, is_approved: bool) -> post::Model {
        post::Model {
            id: uuid::Uuid::new_v4(),
            author_id: uuid::Uuid::new_v4(),
            title: title.to_owned(),
            slug: uuid::Uuid::new_v4().to_string(),
            content: "Content".to_owned(),
            image: None,
            date_posted: chrono::Utc::now().into(),
            is_approved,
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let model = post_model("Test Post", true);
        let post_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
        assert!(post.is_approved);
    }

    #[tokio::test]
    async fn test_find_post_by_slug_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert!(repo.find_by_slug("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_post_returns_stored_row() {
        let draft = PostDraft {
            title: "Hello".into(),
            content: "World".into(),
            ..Default::default()
        };
        let post = Post::new(uuid::Uuid::new_v4(), draft).unwrap();
        let stored = post::Model {
            id: post.id,
            author_id: post.author_id,
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            image: None,
            date_posted: post.date_posted.into(),
            is_approved: false,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let saved = repo.insert(post.clone()).await.unwrap();

        assert_eq!(saved.id, post.id);
        assert!(!saved.is_approved);
    }

    #[tokio::test]
    async fn test_update_missing_post_is_not_found() {
        let post = Post::from(post_model("Gone", false));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert!(matches!(
            repo.update(post).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert!(matches!(
            BaseRepository::<Post, _>::delete(&repo, uuid::Uuid::new_v4()).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_find_user_by_username() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: uuid::Uuid::new_v4(),
                username: "ada".to_owned(),
                email: "ada@example.com".to_owned(),
                password_hash: "hash".to_owned(),
                is_staff: true,
                date_joined: chrono::Utc::now().into(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        let user: User = repo.find_by_username("ada").await.unwrap().unwrap();
        assert_eq!(user.username, "ada");
        assert!(user.is_staff);
    }

    #[tokio::test]
    async fn test_find_comments_by_post() {
        let post_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                comment::Model {
                    id: uuid::Uuid::new_v4(),
                    user_id: uuid::Uuid::new_v4(),
                    post_id,
                    body: "second".to_owned(),
                    date_posted: now.into(),
                },
                comment::Model {
                    id: uuid::Uuid::new_v4(),
                    user_id: uuid::Uuid::new_v4(),
                    post_id,
                    body: "first".to_owned(),
                    date_posted: (now - chrono::TimeDelta::minutes(5)).into(),
                },
            ]])
            .into_connection();

        let repo = PostgresCommentRepository::new(db);
        let comments = repo.find_by_post(post_id).await.unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].body, "second");
    }
}
