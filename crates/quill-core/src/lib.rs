//! # Quill Core
//!
//! The domain layer of the Quill blog.
//! This crate contains the approval workflow, the post query model and the
//! access rules, with zero infrastructure dependencies.

pub mod access;
pub mod domain;
pub mod error;
pub mod ports;
pub mod query;

pub use access::Actor;
pub use error::{DomainError, RepoError};
