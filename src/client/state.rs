//! Accumulated client-side view of the paginated post list.

use std::collections::HashMap;

use folio_api_types::{BlogPostsResponse, MonthGroup, PaginationMeta, PostMeta};

use crate::domain::posts::{group_by_month, sort_newest_first};

/// Coarse lifecycle of the controller, derived from [`PaginationState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    pub posts: Vec<PostMeta>,
    pub month_groups: Vec<MonthGroup>,
    pub is_loading: bool,
    pub has_more: bool,
    pub has_previous: bool,
    pub next_cursor: Option<String>,
    pub prev_cursor: Option<String>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub error: Option<String>,
}

impl PaginationState {
    /// Page-one state built from posts the caller already holds.
    pub fn initial(posts: &[PostMeta], limit: usize) -> Self {
        let limit = limit.max(1);
        let slice: Vec<PostMeta> = posts.iter().take(limit).cloned().collect();
        let has_more = posts.len() > limit;
        let next_cursor = if has_more {
            slice.last().map(|post| post.date.clone())
        } else {
            None
        };

        Self {
            month_groups: group_by_month(&slice),
            posts: slice,
            is_loading: false,
            has_more,
            has_previous: false,
            next_cursor,
            prev_cursor: None,
            current_page: 1,
            total_pages: posts.len().div_ceil(limit),
            total_count: posts.len(),
            error: None,
        }
    }

    pub fn status(&self) -> LoadStatus {
        if self.is_loading {
            LoadStatus::Loading
        } else if self.error.is_some() {
            LoadStatus::Error
        } else {
            LoadStatus::Idle
        }
    }

    /// Accumulate a fetched page: dedup by slug, re-sort, regroup, and take
    /// the server's metadata as-is.
    pub fn merge(&mut self, page: BlogPostsResponse) {
        let BlogPostsResponse {
            posts, pagination, ..
        } = page;

        let mut merged = dedup_by_slug(std::mem::take(&mut self.posts).into_iter().chain(posts));
        sort_newest_first(&mut merged);

        self.month_groups = group_by_month(&merged);
        self.posts = merged;
        self.adopt(pagination);
    }

    /// Discard accumulated posts in favour of a single fetched page.
    pub fn replace(&mut self, page: BlogPostsResponse) {
        self.posts = page.posts;
        self.month_groups = page.month_groups;
        self.adopt(page.pagination);
    }

    fn adopt(&mut self, meta: PaginationMeta) {
        self.has_more = meta.has_more;
        self.has_previous = meta.has_previous;
        self.next_cursor = meta.next_cursor;
        self.prev_cursor = meta.prev_cursor;
        self.current_page = meta.current_page;
        self.total_pages = meta.total_pages;
        self.total_count = meta.total_count;
        self.error = None;
    }
}

/// One entry per slug, at the position of its first occurrence, holding the
/// last value seen.
fn dedup_by_slug(posts: impl IntoIterator<Item = PostMeta>) -> Vec<PostMeta> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<PostMeta> = Vec::new();

    for post in posts {
        match index.get(&post.slug) {
            Some(&at) => out[at] = post,
            None => {
                index.insert(post.slug.clone(), out.len());
                out.push(post);
            }
        }
    }

    out
}
