use std::cmp::Reverse;

use folio_api_types::{MonthGroup, PostMeta};
use time::{
    Date, Month, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

pub const MONTH_LABEL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:long] [year]");
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const LOCAL_DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

pub const UNDATED_LABEL: &str = "Unknown date";

/// Calendar month a post belongs to, computed in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthKey {
    Calendar { year: i32, month: Month },
    Undated,
}

impl MonthKey {
    pub fn of(date: &str) -> Self {
        match parse_post_date(date) {
            Some(moment) => {
                let utc = moment.to_offset(UtcOffset::UTC);
                MonthKey::Calendar {
                    year: utc.year(),
                    month: utc.month(),
                }
            }
            None => MonthKey::Undated,
        }
    }

    pub fn of_post(post: &PostMeta) -> Self {
        Self::of(&post.date)
    }

    /// Display label, e.g. `March 2024`.
    pub fn label(&self) -> String {
        match self {
            MonthKey::Calendar { year, month } => Date::from_calendar_date(*year, *month, 1)
                .ok()
                .and_then(|first| first.format(MONTH_LABEL_FORMAT).ok())
                .unwrap_or_else(|| UNDATED_LABEL.to_string()),
            MonthKey::Undated => UNDATED_LABEL.to_string(),
        }
    }
}

/// Parse a post or cursor date.
///
/// Accepts RFC 3339 date-times, offset-less date-times and bare dates; the
/// latter two are read as UTC.
pub fn parse_post_date(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(moment) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(moment);
    }
    if let Ok(moment) = PrimitiveDateTime::parse(value, LOCAL_DATE_TIME_FORMAT) {
        return Some(moment.assume_utc());
    }
    Date::parse(value, DATE_FORMAT)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

pub fn same_month(left: &PostMeta, right: &PostMeta) -> bool {
    MonthKey::of_post(left) == MonthKey::of_post(right)
}

/// Stable sort, newest first. Posts whose date does not parse go last.
pub fn sort_newest_first(posts: &mut [PostMeta]) {
    posts.sort_by_cached_key(|post| Reverse(parse_post_date(&post.date)));
}

/// Group consecutive posts sharing a month. Indices are relative to `posts`
/// and `ends_at` is inclusive.
pub fn group_by_month(posts: &[PostMeta]) -> Vec<MonthGroup> {
    let mut groups: Vec<MonthGroup> = Vec::new();
    let mut current: Option<MonthKey> = None;

    for (index, post) in posts.iter().enumerate() {
        let key = MonthKey::of_post(post);
        match groups.last_mut() {
            Some(group) if current == Some(key) => {
                group.posts.push(post.clone());
                group.ends_at = index;
            }
            _ => {
                groups.push(MonthGroup {
                    month_year: key.label(),
                    posts: vec![post.clone()],
                    starts_at: index,
                    ends_at: index,
                });
                current = Some(key);
            }
        }
    }

    groups
}

#[cfg(test)]
pub(crate) mod fixtures {
    use folio_api_types::PostMeta;

    pub fn post(slug: &str, date: &str) -> PostMeta {
        PostMeta {
            slug: slug.to_string(),
            title: format!("Post {slug}"),
            date: date.to_string(),
            excerpt: String::new(),
            reading_time: 3,
            tags: Vec::new(),
            published: true,
        }
    }
}
