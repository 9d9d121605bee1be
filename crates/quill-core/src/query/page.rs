use serde::Serialize;

use crate::error::DomainError;

/// Posts per page on every public listing.
pub const PAGE_SIZE: u64 = 3;

/// Largest row offset a listing query may ask for; SQL offsets are signed.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// A 1-based page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PageRequest {
    pub fn new(number: u64) -> Self {
        Self {
            number,
            size: PAGE_SIZE,
        }
    }

    /// Parse the `page` query parameter. Absent means the first page;
    /// zero, anything non-numeric, or a page whose row offset would exceed
    /// what a signed SQL offset can hold is not a page.
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };

        match raw.trim().parse::<u64>() {
            Ok(number) if Self::offset_of(number, PAGE_SIZE).is_some() => Ok(Self::new(number)),
            _ => Err(DomainError::not_found("page", raw)),
        }
    }

    fn offset_of(number: u64, size: u64) -> Option<u64> {
        number
            .checked_sub(1)?
            .checked_mul(size)
            .filter(|offset| *offset <= MAX_OFFSET)
    }

    pub fn offset(&self) -> u64 {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }
}

/// One page of results plus the totals needed to render navigation.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub size: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            number: request.number,
            size: request.size,
            total_items,
        }
    }

    /// Cut a page out of an already ordered, fully materialized result.
    pub fn from_ordered(all: Vec<T>, request: PageRequest) -> Self {
        let total_items = all.len() as u64;
        let items = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .collect();
        Self::new(items, request, total_items)
    }

    /// An empty listing still has one (empty) page.
    pub fn total_pages(&self) -> u64 {
        if self.total_items == 0 {
            1
        } else {
            self.total_items.div_ceil(self.size.max(1))
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Reject a request past the last page.
    pub fn ensure_in_range(self) -> Result<Self, DomainError> {
        let available = self.total_pages();
        if self.number > available {
            return Err(DomainError::InvalidPage {
                requested: self.number,
                available,
            });
        }
        Ok(self)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_items: self.total_items,
        }
    }
}
