//! Month-aware cursor pagination over a newest-first post collection.
//!
//! Cursors are post dates. A page never ends (or starts) in the middle of a
//! calendar month while more posts of that month sit right across the
//! boundary, so a page may hold more than `limit` posts.

use folio_api_types::{BlogPostsResponse, Direction, PaginationMeta, PostMeta};

use crate::domain::posts::{group_by_month, parse_post_date, same_month};

pub const DEFAULT_PAGE_LIMIT: usize = 10;
pub const MAX_PAGE_LIMIT: usize = 50;

/// Default and ceiling applied to the `limit` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    default: usize,
    max: usize,
}

impl PageLimits {
    /// Both values are raised to at least one; the default never exceeds the ceiling.
    pub fn new(default: usize, max: usize) -> Self {
        let max = max.max(1);
        Self {
            default: default.clamp(1, max),
            max,
        }
    }

    pub fn default_limit(&self) -> usize {
        self.default
    }

    pub fn max_limit(&self) -> usize {
        self.max
    }

    /// Resolve a raw `limit` value: non-numeric input yields the default,
    /// numeric input is clamped to `1..=max`.
    pub fn resolve(&self, raw: Option<&str>) -> usize {
        let requested = raw
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .and_then(|value| value.parse::<i64>().ok());

        match requested {
            Some(value) => {
                let ceiling = i64::try_from(self.max).unwrap_or(i64::MAX);
                usize::try_from(value.clamp(1, ceiling)).unwrap_or(self.default)
            }
            None => self.default,
        }
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT)
    }
}

/// Cursor-aware page request.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub cursor: Option<&'a str>,
    pub limit: usize,
    pub direction: Direction,
}

impl<'a> PageRequest<'a> {
    pub fn new(cursor: Option<&'a str>, limit: usize, direction: Direction) -> Self {
        Self {
            cursor: cursor.filter(|value| !value.is_empty()),
            limit,
            direction,
        }
    }

    pub fn first(limit: usize) -> Self {
        Self::new(None, limit, Direction::Next)
    }
}

/// Compute one page of `all`, which must be sorted newest first.
pub fn paginate(all: &[PostMeta], request: PageRequest<'_>) -> BlogPostsResponse {
    let limit = request.limit.max(1);
    let total = all.len();

    let start = resolve_start(all, request.cursor, request.direction, limit);
    let end = start.saturating_add(limit).min(total);
    let (start, end) = extend_to_month_boundaries(all, start, end);

    let posts = all[start..end].to_vec();
    let month_groups = group_by_month(&posts);

    let has_more = end < total;
    let has_previous = start > 0;
    let next_cursor = if has_more {
        posts.last().map(|post| post.date.clone())
    } else {
        None
    };
    let prev_cursor = if has_previous {
        all.get(start).map(|post| post.date.clone())
    } else {
        None
    };

    BlogPostsResponse {
        posts,
        pagination: PaginationMeta {
            has_more,
            has_previous,
            next_cursor,
            prev_cursor,
            total_count: total,
            current_page: start / limit + 1,
            total_pages: total.div_ceil(limit),
        },
        month_groups,
    }
}

fn resolve_start(
    all: &[PostMeta],
    cursor: Option<&str>,
    direction: Direction,
    limit: usize,
) -> usize {
    let Some(cursor) = cursor else {
        return 0;
    };

    match direction {
        Direction::Next => {
            // Last exact match, so posts sharing the cursor date are not repeated.
            if let Some(index) = all.iter().rposition(|post| post.date == cursor) {
                return index + 1;
            }
            let Some(boundary) = parse_post_date(cursor) else {
                return all.len();
            };
            all.iter()
                .position(|post| parse_post_date(&post.date).is_some_and(|date| date < boundary))
                .unwrap_or(all.len())
        }
        Direction::Prev => {
            if let Some(index) = all.iter().position(|post| post.date == cursor) {
                return index.saturating_sub(limit);
            }
            let Some(boundary) = parse_post_date(cursor) else {
                return 0;
            };
            all.iter()
                .position(|post| parse_post_date(&post.date).is_some_and(|date| date > boundary))
                .unwrap_or(0)
        }
    }
}

fn extend_to_month_boundaries(all: &[PostMeta], start: usize, end: usize) -> (usize, usize) {
    if start >= end {
        return (start, end);
    }

    let mut end = end;
    while end < all.len() && same_month(&all[end - 1], &all[end]) {
        end += 1;
    }

    let mut start = start;
    while start > 0 && same_month(&all[start], &all[start - 1]) {
        start -= 1;
    }

    (start, end)
}
