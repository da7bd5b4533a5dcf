//! Page slicing with an orphan merge rule.
//!
//! # Responsibility
//! - Compute page counts and row windows for ordered result sets.
//! - Parse user-supplied page numbers strictly or leniently.
//!
//! # Invariants
//! - There is always at least one page, even for an empty sequence.
//! - A trailing page holding `orphans` rows or fewer is merged into the
//!   previous page.
//! - Page numbers are 1-based.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// Page number is not a positive integer.
    InvalidNumber(String),
    /// Page number is an integer outside `1..=num_pages`.
    EmptyPage { number: i64, num_pages: u32 },
}

impl Display for PageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber(raw) => write!(f, "page number `{raw}` is not an integer"),
            Self::EmptyPage { number, num_pages } => {
                write!(f, "page {number} is out of range 1..={num_pages}")
            }
        }
    }
}

impl Error for PageError {}

/// Row window of one page inside the full ordered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u32,
    pub offset: u32,
    pub limit: u32,
}

/// Page-count arithmetic for a sequence of `count` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: u64,
    per_page: u32,
    orphans: u32,
}

impl Paginator {
    /// `per_page` of zero is treated as one.
    pub fn new(count: u64, per_page: u32, orphans: u32) -> Self {
        Self {
            count,
            per_page: per_page.max(1),
            orphans,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn num_pages(&self) -> u32 {
        let hits = self.count.saturating_sub(u64::from(self.orphans)).max(1);
        let pages = hits.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Strictly validates a page number.
    pub fn validate_number(&self, number: i64) -> Result<u32, PageError> {
        let num_pages = self.num_pages();
        match u32::try_from(number) {
            Ok(valid) if (1..=num_pages).contains(&valid) => Ok(valid),
            _ => Err(PageError::EmptyPage { number, num_pages }),
        }
    }

    /// Parses a raw page parameter strictly.
    pub fn parse_number(&self, raw: &str) -> Result<u32, PageError> {
        let number = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| PageError::InvalidNumber(raw.to_string()))?;
        self.validate_number(number)
    }

    /// Parses a raw page parameter, falling back instead of failing:
    /// missing or non-integer input gives page 1, any integer out of range
    /// (zero and negatives included) gives the last page.
    pub fn lenient_number(&self, raw: Option<&str>) -> u32 {
        let Some(raw) = raw else {
            return 1;
        };
        match self.parse_number(raw) {
            Ok(number) => number,
            Err(PageError::InvalidNumber(_)) => 1,
            Err(PageError::EmptyPage { .. }) => self.num_pages(),
        }
    }

    /// Returns the row window of a validated page.
    pub fn window(&self, number: u32) -> Result<PageWindow, PageError> {
        let number = self.validate_number(i64::from(number))?;
        let bottom = u64::from(number - 1) * u64::from(self.per_page);
        let mut top = bottom + u64::from(self.per_page);
        if top + u64::from(self.orphans) >= self.count {
            top = self.count;
        }
        Ok(PageWindow {
            number,
            offset: u32::try_from(bottom).unwrap_or(u32::MAX),
            limit: u32::try_from(top.saturating_sub(bottom)).unwrap_or(u32::MAX),
        })
    }
}

/// One page of items plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub num_pages: u32,
    pub total_count: u64,
    per_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: u32, paginator: Paginator) -> Self {
        Self {
            items,
            number,
            num_pages: paginator.num_pages(),
            total_count: paginator.count(),
            per_page: paginator.per_page(),
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_other_pages(&self) -> bool {
        self.has_next() || self.has_previous()
    }

    pub fn next_page_number(&self) -> Option<u32> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u32> {
        self.has_previous().then(|| self.number - 1)
    }

    /// 1-based index of the first item on this page; 0 when empty.
    pub fn start_index(&self) -> u64 {
        if self.total_count == 0 {
            return 0;
        }
        u64::from(self.per_page) * u64::from(self.number - 1) + 1
    }

    /// 1-based index of the last item on this page.
    pub fn end_index(&self) -> u64 {
        if self.number == self.num_pages {
            return self.total_count;
        }
        u64::from(self.number) * u64::from(self.per_page)
    }
}
