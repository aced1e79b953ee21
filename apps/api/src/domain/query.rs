use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_POST_LIMIT: u32 = 25;
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Ordering of posts by creation date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Filter and paging options for the post feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
    /// Matches posts carrying any of these tags; empty means no filter
    pub tags: Vec<Uuid>,
    pub sort_direction: SortDirection,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_POST_LIMIT,
            tags: Vec::new(),
            sort_direction: SortDirection::default(),
        }
    }
}

impl PostQuery {
    /// Number of rows to skip before the requested page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.limit)
    }
}

/// Title substring search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: String,
    pub limit: u32,
}

impl SearchQuery {
    pub fn new(title: impl Into<String>, limit: Option<u32>) -> Self {
        Self {
            title: title.into(),
            limit: limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        }
    }
}

/// One page of a result set
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub entities: Vec<T>,
    pub current_page: u32,
    pub total_pages: u64,
    pub items_per_page: u32,
    pub total_items: u64,
}

impl<T> PaginationResult<T> {
    pub fn new(entities: Vec<T>, query: &PostQuery, total_items: u64) -> Self {
        Self {
            entities,
            current_page: query.page,
            total_pages: total_pages(total_items, query.limit),
            items_per_page: query.limit,
            total_items,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginationResult<U> {
        PaginationResult {
            entities: self.entities.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            items_per_page: self.items_per_page,
            total_items: self.total_items,
        }
    }
}

/// `ceil(total_items / limit)`; zero when the limit is zero
pub fn total_pages(total_items: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(limit))
}
