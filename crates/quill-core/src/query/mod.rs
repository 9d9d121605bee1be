//! Query model for the public post views: filters and pagination.

mod filter;
mod page;

pub use filter::{month_range, PostFilter};
pub use page::{Page, PageRequest, PAGE_SIZE};
