//! Wire types shared by the folio server and its clients.
//!
//! Field names follow the camelCase JSON contract of `GET /api/blog/posts`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Path of the paginated posts endpoint.
pub const POSTS_PATH: &str = "/api/blog/posts";

/// Public message returned with every failed posts request.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch blog posts";

/// Query parameter names understood by the posts endpoint.
pub mod params {
    pub const CURSOR: &str = "cursor";
    pub const LIMIT: &str = "limit";
    pub const DIRECTION: &str = "direction";
    pub const LOCALE: &str = "locale";
    pub const PAGE: &str = "page";
}

fn default_published() -> bool {
    true
}

/// Metadata for a single post, as listed by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    pub slug: String,
    pub title: String,
    /// ISO-8601 date (`2024-03-01`) or date-time.
    pub date: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default, alias = "reading_time")]
    pub reading_time: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_published")]
    pub published: bool,
}

/// Contiguous run of posts sharing a calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGroup {
    pub month_year: String,
    pub posts: Vec<PostMeta>,
    pub starts_at: usize,
    pub ends_at: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub has_more: bool,
    pub has_previous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_cursor: Option<String>,
    pub total_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
}

/// Body of a successful `GET /api/blog/posts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostsResponse {
    pub posts: Vec<PostMeta>,
    pub pagination: PaginationMeta,
    pub month_groups: Vec<MonthGroup>,
}

/// Body of a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Which side of the cursor a page is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Older posts, after the cursor.
    #[default]
    Next,
    /// Newer posts, before the cursor.
    Prev,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Next => "next",
            Direction::Prev => "prev",
        }
    }

    /// Parse a query value; anything other than `prev` reads forward.
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("prev") => Direction::Prev,
            _ => Direction::Next,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDirection(pub String);

impl fmt::Display for UnknownDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown direction `{}` (expected `next` or `prev`)", self.0)
    }
}

impl std::error::Error for UnknownDirection {}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "next" => Ok(Direction::Next),
            "prev" => Ok(Direction::Prev),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}
