//! Resumable page position kept in the address's `cursor` and `page` parameters.

use std::sync::Mutex;

use folio_api_types::params;
use reqwest::Url;

use crate::infra::lock::mutex_lock;

/// Address the paginated list is displayed under.
pub trait Location: Send + Sync {
    fn current(&self) -> Url;
    /// Swap the current address in place, without adding a history entry.
    fn replace(&self, url: Url);
}

/// In-memory location, used by the command-line browser and in tests.
#[derive(Debug)]
pub struct MemoryLocation {
    url: Mutex<Url>,
}

impl MemoryLocation {
    pub fn new(url: Url) -> Self {
        Self {
            url: Mutex::new(url),
        }
    }
}

impl Location for MemoryLocation {
    fn current(&self) -> Url {
        mutex_lock(&self.url, "client::location", "current").clone()
    }

    fn replace(&self, url: Url) {
        *mutex_lock(&self.url, "client::location", "replace") = url;
    }
}

pub fn cursor_of(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == params::CURSOR)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// `url` with `cursor` set (or removed when `None`) and `page` set.
pub fn with_position(url: &Url, cursor: Option<&str>, page: usize) -> Url {
    let mut extra = Vec::with_capacity(2);
    if let Some(cursor) = cursor {
        extra.push((params::CURSOR, cursor.to_string()));
    }
    extra.push((params::PAGE, page.to_string()));
    rewrite(url, &extra)
}

/// `url` with both `cursor` and `page` removed.
pub fn without_position(url: &Url) -> Url {
    rewrite(url, &[])
}

fn is_position_key(key: &str) -> bool {
    key == params::CURSOR || key == params::PAGE
}

fn rewrite(url: &Url, extra: &[(&str, String)]) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_position_key(key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut next = url.clone();
    next.set_query(None);
    if kept.is_empty() && extra.is_empty() {
        return next;
    }

    {
        let mut qp = next.query_pairs_mut();
        for (key, value) in &kept {
            qp.append_pair(key, value);
        }
        for (key, value) in extra {
            qp.append_pair(key, value);
        }
    }
    next
}
