//! In-process snapshot cache in front of a [`PostsSource`].
//!
//! Each locale's collection is held as an immutable `Arc<[PostMeta]>`; a
//! request paginates whatever snapshot it received, so reloads never disturb
//! requests already in flight.

use std::{
    num::NonZeroUsize,
    sync::{Arc, RwLock},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use lru::LruCache;
use metrics::counter;
use tracing::debug;

use crate::application::repos::{PostSnapshot, PostsSource, RepoError};

use super::lock::rw_write;

const SOURCE: &str = "infra::cache";

pub const CACHE_HIT_TOTAL: &str = "folio_content_cache_hit_total";
pub const CACHE_MISS_TOTAL: &str = "folio_content_cache_miss_total";
pub const CACHE_EVICT_TOTAL: &str = "folio_content_cache_evict_total";

struct CachedSnapshot {
    posts: PostSnapshot,
    loaded_at: Instant,
}

pub struct CachedPostsSource {
    inner: Arc<dyn PostsSource>,
    entries: RwLock<LruCache<String, CachedSnapshot>>,
    /// `None` keeps snapshots until evicted or invalidated.
    ttl: Option<Duration>,
}

impl CachedPostsSource {
    pub fn new(
        inner: Arc<dyn PostsSource>,
        capacity: NonZeroUsize,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            inner,
            entries: RwLock::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Drop the cached snapshot for one locale.
    pub fn invalidate(&self, locale: &str) {
        let mut entries = rw_write(&self.entries, SOURCE, "invalidate");
        entries.pop(locale);
    }

    fn lookup(&self, locale: &str) -> Option<PostSnapshot> {
        let mut entries = rw_write(&self.entries, SOURCE, "lookup");
        let entry = entries.get(locale)?;
        let fresh = self.ttl.is_none_or(|ttl| entry.loaded_at.elapsed() < ttl);
        fresh.then(|| entry.posts.clone())
    }

    fn store(&self, locale: &str, posts: PostSnapshot) {
        let mut entries = rw_write(&self.entries, SOURCE, "store");
        let replaced = entries.push(
            locale.to_string(),
            CachedSnapshot {
                posts,
                loaded_at: Instant::now(),
            },
        );
        if let Some((evicted, _)) = replaced {
            if evicted != locale {
                counter!(CACHE_EVICT_TOTAL).increment(1);
                debug!(
                    target = "folio::cache",
                    evicted = %evicted,
                    "Evicted post snapshot"
                );
            }
        }
    }
}

#[async_trait]
impl PostsSource for CachedPostsSource {
    async fn all_posts_meta(&self, locale: &str) -> Result<PostSnapshot, RepoError> {
        if let Some(posts) = self.lookup(locale) {
            counter!(CACHE_HIT_TOTAL).increment(1);
            return Ok(posts);
        }

        counter!(CACHE_MISS_TOTAL).increment(1);
        let posts = self.inner.all_posts_meta(locale).await?;
        self.store(locale, posts.clone());
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::posts::fixtures::post;

    #[derive(Default)]
    struct CountingSource {
        loads: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl PostsSource for CountingSource {
        async fn all_posts_meta(&self, locale: &str) -> Result<PostSnapshot, RepoError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RepoError::invalid_locale(locale));
            }
            Ok(vec![post(locale, "2024-01-01")].into())
        }
    }

    fn capacity(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).expect("non-zero capacity")
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let inner = Arc::new(CountingSource::default());
        let cache = CachedPostsSource::new(inner.clone(), capacity(4), None);

        let first = cache.all_posts_meta("en").await.expect("first load");
        let second = cache.all_posts_meta("en").await.expect("cached load");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(inner.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_snapshots_are_reloaded() {
        let inner = Arc::new(CountingSource::default());
        let cache = CachedPostsSource::new(inner.clone(), capacity(4), Some(Duration::ZERO));

        cache.all_posts_meta("en").await.expect("first load");
        cache.all_posts_meta("en").await.expect("reload");

        assert_eq!(inner.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn least_recent_locale_is_evicted() {
        let inner = Arc::new(CountingSource::default());
        let cache = CachedPostsSource::new(inner.clone(), capacity(1), None);

        cache.all_posts_meta("en").await.expect("en");
        cache.all_posts_meta("de").await.expect("de");
        cache.all_posts_meta("en").await.expect("en again");

        assert_eq!(inner.loads.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let inner = Arc::new(CountingSource::default());
        let cache = CachedPostsSource::new(inner.clone(), capacity(4), None);

        cache.all_posts_meta("en").await.expect("load");
        cache.invalidate("en");
        cache.all_posts_meta("en").await.expect("reload");

        assert_eq!(inner.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let inner = Arc::new(CountingSource {
            fail: true,
            ..Default::default()
        });
        let cache = CachedPostsSource::new(inner.clone(), capacity(4), None);

        assert!(cache.all_posts_meta("en").await.is_err());
        assert!(cache.all_posts_meta("en").await.is_err());
        assert_eq!(inner.loads.load(Ordering::SeqCst), 2);
    }
}
