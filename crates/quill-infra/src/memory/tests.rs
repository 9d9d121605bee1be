use chrono::{TimeDelta, TimeZone, Utc};
use uuid::Uuid;

use quill_core::domain::{Comment, Post, PostDraft, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};
use quill_core::query::{PageRequest, PostFilter};

use super::InMemoryStore;

async fn user(store: &InMemoryStore, username: &str) -> User {
    let user = User::new(
        username.to_string(),
        format!("{username}@example.com"),
        "hash".to_string(),
    );
    store.users().insert(user).await.unwrap()
}

/// Insert a post `age_minutes` old.
async fn post(
    store: &InMemoryStore,
    author: &User,
    title: &str,
    content: &str,
    approved: bool,
    age_minutes: i64,
) -> Post {
    let mut post = Post::new(
        author.id,
        PostDraft {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        },
    )
    .unwrap();
    post.date_posted = Utc::now() - TimeDelta::minutes(age_minutes);
    if approved {
        post.approve();
    }
    store.posts().insert(post).await.unwrap()
}

fn titles(page: &quill_core::query::Page<quill_core::domain::AuthoredPost>) -> Vec<&str> {
    page.items.iter().map(|p| p.post.title.as_str()).collect()
}

#[tokio::test]
async fn test_unapproved_posts_are_never_listed() {
    let store = InMemoryStore::new();
    let ada = user(&store, "ada").await;
    let published = post(&store, &ada, "Hello", "first words", true, 10).await;
    post(&store, &ada, "Draft", "hello again", false, 5).await;

    let year = published.date_posted.format("%Y").to_string().parse().unwrap();
    let month = published.date_posted.format("%m").to_string().parse().unwrap();

    let filters = [
        PostFilter::All,
        PostFilter::search(Some("hello")),
        PostFilter::Author(ada.id),
        PostFilter::by_month(year, month).unwrap(),
    ];

    let repo = store.posts();
    for filter in filters {
        let page = repo.find_approved(&filter, PageRequest::new(1)).await.unwrap();
        assert_eq!(titles(&page), vec!["Hello"], "filter {filter:?}");
    }
}

#[tokio::test]
async fn test_empty_search_equals_full_listing() {
    let store = InMemoryStore::new();
    let ada = user(&store, "ada").await;
    for (i, title) in ["One", "Two", "Three", "Four"].iter().enumerate() {
        post(&store, &ada, title, "body", true, i as i64).await;
    }

    let repo = store.posts();
    for number in 1..=2 {
        let all = repo
            .find_approved(&PostFilter::All, PageRequest::new(number))
            .await
            .unwrap();
        let searched = repo
            .find_approved(&PostFilter::search(Some("")), PageRequest::new(number))
            .await
            .unwrap();

        assert_eq!(titles(&all), titles(&searched));
        assert_eq!(all.total_items, searched.total_items);
    }
}

#[tokio::test]
async fn test_search_matches_title_content_or_author_once() {
    let store = InMemoryStore::new();
    let ada = user(&store, "ada").await;
    let hello = user(&store, "HelloFan").await;

    post(&store, &ada, "Hello World", "hello hello", true, 1).await;
    post(&store, &ada, "Goodbye", "nothing here", true, 2).await;
    post(&store, &ada, "Notes", "I said HELLO", true, 3).await;
    post(&store, &hello, "Untitled", "plain", true, 4).await;

    let page = store
        .posts()
        .find_approved(&PostFilter::search(Some("hello")), PageRequest::new(1))
        .await
        .unwrap();

    // matches on title, content and author; the first one matches all three
    assert_eq!(page.total_items, 3);
    assert_eq!(titles(&page), vec!["Hello World", "Notes", "Untitled"]);
}

#[tokio::test]
async fn test_listing_is_newest_first_in_pages_of_three() {
    let store = InMemoryStore::new();
    let ada = user(&store, "ada").await;
    for (age, title) in ["a", "b", "c", "d", "e"].iter().enumerate() {
        post(&store, &ada, title, "body", true, age as i64).await;
    }

    let repo = store.posts();
    let first = repo
        .find_approved(&PostFilter::All, PageRequest::new(1))
        .await
        .unwrap();
    assert_eq!(titles(&first), vec!["a", "b", "c"]);
    assert_eq!(first.total_pages(), 2);

    let second = repo
        .find_approved(&PostFilter::All, PageRequest::new(2))
        .await
        .unwrap();
    assert_eq!(titles(&second), vec!["d", "e"]);
    assert!(!second.has_next());
}

#[tokio::test]
async fn test_author_filter() {
    let store = InMemoryStore::new();
    let ada = user(&store, "ada").await;
    let bob = user(&store, "bob").await;
    post(&store, &ada, "By Ada", "x", true, 1).await;
    post(&store, &bob, "By Bob", "x", true, 2).await;

    let page = store
        .posts()
        .find_approved(&PostFilter::Author(bob.id), PageRequest::new(1))
        .await
        .unwrap();

    assert_eq!(titles(&page), vec!["By Bob"]);
    assert_eq!(page.items[0].author, "bob");
}

#[tokio::test]
async fn test_month_filter() {
    let store = InMemoryStore::new();
    let ada = user(&store, "ada").await;
    let mut march = post(&store, &ada, "March", "x", true, 0).await;
    let mut april = post(&store, &ada, "April", "x", true, 0).await;

    march.date_posted = Utc.with_ymd_and_hms(2024, 3, 31, 23, 0, 0).unwrap();
    april.date_posted = Utc.with_ymd_and_hms(2024, 4, 1, 1, 0, 0).unwrap();
    let repo = store.posts();
    repo.update(march).await.unwrap();
    repo.update(april).await.unwrap();

    let page = repo
        .find_approved(&PostFilter::by_month(2024, 3).unwrap(), PageRequest::new(1))
        .await
        .unwrap();

    assert_eq!(titles(&page), vec!["March"]);
}

#[tokio::test]
async fn test_title_and_slug_are_unique() {
    let store = InMemoryStore::new();
    let ada = user(&store, "ada").await;
    let first = post(&store, &ada, "Hello", "x", false, 0).await;

    let same_title = Post::new(
        ada.id,
        PostDraft {
            title: "Hello".into(),
            content: "y".into(),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(matches!(
        store.posts().insert(same_title).await,
        Err(RepoError::Constraint(_))
    ));

    let same_slug = Post::new(
        ada.id,
        PostDraft {
            title: "Other".into(),
            slug: Some(first.slug.clone()),
            content: "y".into(),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(matches!(
        store.posts().insert(same_slug).await,
        Err(RepoError::Constraint(_))
    ));
}

#[tokio::test]
async fn test_deleting_post_cascades_to_comments() {
    let store = InMemoryStore::new();
    let ada = user(&store, "ada").await;
    let hello = post(&store, &ada, "Hello", "x", true, 0).await;

    let comments = store.comments();
    let comment = comments
        .insert(Comment::new(ada.id, hello.id, "first!").unwrap())
        .await
        .unwrap();

    store.posts().delete(hello.id).await.unwrap();

    assert!(comments.find_by_id(comment.id).await.unwrap().is_none());
    assert!(comments.find_by_post(hello.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleting_user_cascades_to_posts() {
    let store = InMemoryStore::new();
    let ada = user(&store, "ada").await;
    let hello = post(&store, &ada, "Hello", "x", true, 0).await;

    store.users().delete(ada.id).await.unwrap();

    assert!(store.posts().find_by_id(hello.id).await.unwrap().is_none());
    assert!(store.users().find_by_username("ada").await.unwrap().is_none());
}

#[tokio::test]
async fn test_comment_requires_existing_post() {
    let store = InMemoryStore::new();
    let ada = user(&store, "ada").await;

    let orphan = Comment::new(ada.id, Uuid::new_v4(), "hi").unwrap();
    assert!(matches!(
        store.comments().insert(orphan).await,
        Err(RepoError::Constraint(_))
    ));
}

#[tokio::test]
async fn test_pending_lists_only_unapproved() {
    let store = InMemoryStore::new();
    let ada = user(&store, "ada").await;
    post(&store, &ada, "Live", "x", true, 2).await;
    post(&store, &ada, "Waiting", "x", false, 1).await;

    let pending = store.posts().find_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].post.title, "Waiting");
    assert_eq!(pending[0].author, "ada");
}
