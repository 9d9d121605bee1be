use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::Post;
use crate::error::DomainError;

/// Which approved posts a public view shows.
///
/// Every variant only ever selects approved posts; the repositories apply
/// the approval condition before the variant's own condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// Every approved post.
    All,
    /// Case-insensitive substring of title, content or author username.
    Search(String),
    /// Posts written by one author.
    Author(Uuid),
    /// Posts whose `date_posted` falls in a calendar month (UTC).
    Month { year: i32, month: u32 },
}

impl PostFilter {
    /// Build a search filter. A missing or blank term selects everything.
    pub fn search(term: Option<&str>) -> Self {
        match term {
            Some(t) if !t.trim().is_empty() => Self::Search(t.to_string()),
            _ => Self::All,
        }
    }

    pub fn by_month(year: i32, month: u32) -> Result<Self, DomainError> {
        month_range(year, month).ok_or_else(|| {
            DomainError::Validation(format!("Invalid month: {year}/{month}"))
        })?;
        Ok(Self::Month { year, month })
    }

    /// Evaluate the filter against a single post. Used by stores that cannot
    /// push the condition down to a query engine.
    pub fn matches(&self, post: &Post, author_username: &str) -> bool {
        if !post.is_approved {
            return false;
        }

        match self {
            Self::All => true,
            Self::Search(term) => {
                let needle = term.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post.content.to_lowercase().contains(&needle)
                    || author_username.to_lowercase().contains(&needle)
            }
            Self::Author(author_id) => post.author_id == *author_id,
            Self::Month { year, month } => match month_range(*year, *month) {
                Some((start, end)) => post.date_posted >= start && post.date_posted < end,
                None => false,
            },
        }
    }
}

/// Half-open `[start, end)` UTC range covering a calendar month.
pub fn month_range(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;

    Some((
        start.and_hms_opt(0, 0, 0)?.and_utc(),
        end.and_hms_opt(0, 0, 0)?.and_utc(),
    ))
}
