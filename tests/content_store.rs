use std::{fs, num::NonZeroUsize, path::Path, sync::Arc, time::Duration};

use folio::application::pagination::PageLimits;
use folio::application::posts::{BlogPostsService, PostsQuery};
use folio::application::repos::{PostsSource, RepoError};
use folio::infra::cache::CachedPostsSource;
use folio::infra::content::{FileContentStore, POSTS_FILE};
use tempfile::TempDir;

const ENGLISH: &str = r#"
[[posts]]
slug = "spring-notes"
title = "Spring notes"
date = "2024-03-02"
excerpt = "Things that bloomed."
readingTime = 6
tags = ["garden"]

[[posts]]
slug = "winter-draft"
title = "Winter draft"
date = "2024-02-20"
published = false

[[posts]]
slug = "late-february"
title = "Late February"
date = "2024-02-28T18:00:00Z"

[[posts]]
slug = "new-year"
title = "New year"
date = "2024-01-01"
"#;

fn write_locale(root: &Path, locale: &str, contents: &str) {
    let dir = root.join(locale);
    fs::create_dir_all(&dir).expect("create locale dir");
    fs::write(dir.join(POSTS_FILE), contents).expect("write posts file");
}

fn content_root() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    write_locale(dir.path(), "en", ENGLISH);
    dir
}

#[tokio::test]
async fn store_returns_published_posts_newest_first() {
    let root = content_root();
    let store = FileContentStore::new(root.path());

    let posts = store.all_posts_meta("en").await.expect("posts");
    let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();

    assert_eq!(slugs, vec!["spring-notes", "late-february", "new-year"]);
    assert_eq!(posts[0].reading_time, 6);
}

#[tokio::test]
async fn missing_locale_is_an_empty_collection() {
    let root = content_root();
    let store = FileContentStore::new(root.path());

    let posts = store.all_posts_meta("fr").await.expect("posts");

    assert!(posts.is_empty());
}

#[tokio::test]
async fn path_like_locale_is_rejected() {
    let root = content_root();
    let store = FileContentStore::new(root.path());

    let err = store.all_posts_meta("../en").await.expect_err("bad locale");

    assert!(matches!(err, RepoError::InvalidLocale { .. }));
}

#[tokio::test]
async fn malformed_file_is_a_parse_error() {
    let root = content_root();
    write_locale(root.path(), "de", "[[posts]]\nslug = ");
    let store = FileContentStore::new(root.path());

    let err = store.all_posts_meta("de").await.expect_err("parse error");

    assert!(matches!(err, RepoError::Parse { .. }));
}

#[tokio::test]
async fn cached_store_serves_snapshot_until_invalidated() {
    let root = content_root();
    let inner: Arc<dyn PostsSource> = Arc::new(FileContentStore::new(root.path()));
    let capacity = NonZeroUsize::new(4).expect("capacity");
    let cache = CachedPostsSource::new(inner, capacity, Some(Duration::from_secs(300)));

    assert_eq!(cache.all_posts_meta("en").await.expect("posts").len(), 3);

    write_locale(
        root.path(),
        "en",
        "[[posts]]\nslug = \"only\"\ntitle = \"Only\"\ndate = \"2024-05-01\"\n",
    );
    assert_eq!(cache.all_posts_meta("en").await.expect("cached").len(), 3);

    cache.invalidate("en");
    let posts = cache.all_posts_meta("en").await.expect("reloaded");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "only");
}

#[tokio::test]
async fn service_pages_file_content_per_locale() {
    let root = content_root();
    write_locale(
        root.path(),
        "de",
        "[[posts]]\nslug = \"hallo\"\ntitle = \"Hallo\"\ndate = \"2023-12-24\"\n",
    );
    let service = BlogPostsService::new(
        Arc::new(FileContentStore::new(root.path())),
        PageLimits::new(1, 50),
        "en",
    );

    let english = service.page(&PostsQuery::default()).await.expect("en page");
    assert_eq!(english.posts.len(), 1);
    assert!(english.pagination.has_more);

    let second = service
        .page(&PostsQuery {
            cursor: english.pagination.next_cursor.clone(),
            ..Default::default()
        })
        .await
        .expect("second page");
    let slugs: Vec<_> = second.posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["late-february"]);

    let german = service
        .page(&PostsQuery {
            locale: Some("de".to_string()),
            ..Default::default()
        })
        .await
        .expect("de page");
    assert_eq!(german.posts[0].slug, "hallo");
    assert_eq!(german.month_groups[0].month_year, "December 2023");
}
