//! In-memory repositories - used when no database is configured, and in tests.

mod store;

pub use store::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryStore, InMemoryUserRepository,
};

#[cfg(test)]
mod tests;
