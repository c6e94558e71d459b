use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use folio::api_types::{BlogPostsResponse, ErrorBody, PostMeta};
use folio::application::pagination::PageLimits;
use folio::application::posts::BlogPostsService;
use folio::application::repos::{PostSnapshot, PostsSource, RepoError};
use folio::infra::http::{HttpState, REQUEST_ID_HEADER, build_router};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

struct StaticSource(Vec<PostMeta>);

#[async_trait]
impl PostsSource for StaticSource {
    async fn all_posts_meta(&self, _locale: &str) -> Result<PostSnapshot, RepoError> {
        Ok(self.0.clone().into())
    }
}

struct BrokenSource;

#[async_trait]
impl PostsSource for BrokenSource {
    async fn all_posts_meta(&self, _locale: &str) -> Result<PostSnapshot, RepoError> {
        Err(RepoError::Io {
            path: "content/en/posts.toml".into(),
            source: std::io::Error::other("disk unavailable"),
        })
    }
}

fn post(slug: &str, date: &str) -> PostMeta {
    PostMeta {
        slug: slug.to_string(),
        title: format!("Post {slug}"),
        date: date.to_string(),
        excerpt: String::new(),
        reading_time: 2,
        tags: Vec::new(),
        published: true,
    }
}

/// Five January and seven February 2024 posts, newest first.
fn january_february() -> Vec<PostMeta> {
    let february = (1..=7)
        .rev()
        .map(|day| post(&format!("feb-{day}"), &format!("2024-02-{:02}", day * 3)));
    let january = (1..=5)
        .rev()
        .map(|day| post(&format!("jan-{day}"), &format!("2024-01-{:02}", day * 5)));
    february.chain(january).collect()
}

/// One post per month across `count` months, newest first.
fn monthly(count: usize) -> Vec<PostMeta> {
    (0..count)
        .map(|i| {
            let year = 2024 - (i / 12) as i32;
            let month = 12 - (i % 12);
            post(&format!("m{i}"), &format!("{year}-{month:02}-10"))
        })
        .collect()
}

fn router(source: impl PostsSource + 'static) -> Router {
    let posts = BlogPostsService::new(Arc::new(source), PageLimits::default(), "en");
    build_router(HttpState {
        posts: Arc::new(posts),
    })
}

async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    (status, headers, body.to_vec())
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body).expect("json body")
}

#[tokio::test]
async fn first_page_keeps_month_together() {
    let app = router(StaticSource(january_february()));

    let (status, _, body) = get(&app, "/api/blog/posts").await;
    assert_eq!(status, StatusCode::OK);

    let page: BlogPostsResponse = decode(&body);
    assert_eq!(page.posts.len(), 12);
    assert!(!page.pagination.has_more);
    assert!(page.pagination.next_cursor.is_none());
    assert_eq!(page.pagination.total_pages, 2);
    let months: Vec<_> = page
        .month_groups
        .iter()
        .map(|g| (g.month_year.as_str(), g.starts_at, g.ends_at))
        .collect();
    assert_eq!(
        months,
        vec![("February 2024", 0, 6), ("January 2024", 7, 11)]
    );
}

#[tokio::test]
async fn json_uses_camel_case_contract() {
    let app = router(StaticSource(monthly(12)));

    let (_, _, body) = get(&app, "/api/blog/posts?limit=5").await;
    let value: serde_json::Value = decode(&body);

    assert_eq!(value["pagination"]["hasMore"], true);
    assert_eq!(value["pagination"]["nextCursor"], "2024-08-10");
    assert_eq!(value["pagination"]["currentPage"], 1);
    assert!(value["pagination"].get("prevCursor").is_none());
    assert_eq!(value["monthGroups"][0]["monthYear"], "December 2024");
    assert_eq!(value["posts"][0]["readingTime"], 2);
}

#[tokio::test]
async fn next_cursor_walks_whole_collection_once() {
    let all = monthly(23);
    let app = router(StaticSource(all.clone()));

    let mut seen = Vec::new();
    let mut uri = "/api/blog/posts?limit=7".to_string();
    loop {
        let (status, _, body) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::OK);
        let page: BlogPostsResponse = decode(&body);
        seen.extend(page.posts.iter().map(|p| p.slug.clone()));
        match page.pagination.next_cursor {
            Some(cursor) => uri = format!("/api/blog/posts?limit=7&cursor={cursor}"),
            None => break,
        }
    }

    let expected: Vec<_> = all.iter().map(|p| p.slug.clone()).collect();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn prev_direction_returns_newer_posts() {
    let app = router(StaticSource(monthly(30)));

    let (_, _, body) = get(&app, "/api/blog/posts?cursor=2023-04-10&direction=prev&limit=10").await;
    let page: BlogPostsResponse = decode(&body);

    // 2023-04-10 sits at index 20, so the previous page is 10..20.
    assert_eq!(page.posts.first().map(|p| p.slug.as_str()), Some("m10"));
    assert_eq!(page.posts.len(), 10);
    assert!(page.pagination.has_previous);
    assert_eq!(page.pagination.current_page, 2);
}

#[tokio::test]
async fn oversized_limit_is_clamped() {
    let app = router(StaticSource(monthly(80)));

    let (_, _, body) = get(&app, "/api/blog/posts?limit=1000").await;
    let page: BlogPostsResponse = decode(&body);

    assert_eq!(page.posts.len(), 50);
    assert_eq!(page.pagination.total_pages, 2);
}

#[tokio::test]
async fn malformed_limit_falls_back_to_default() {
    let app = router(StaticSource(monthly(30)));

    let (status, _, body) = get(&app, "/api/blog/posts?limit=lots&direction=sideways").await;
    assert_eq!(status, StatusCode::OK);

    let page: BlogPostsResponse = decode(&body);
    assert_eq!(page.posts.len(), 10);
}

#[tokio::test]
async fn repeated_limit_uses_first_value() {
    let app = router(StaticSource(monthly(30)));

    let (status, headers, body) = get(&app, "/api/blog/posts?limit=5&limit=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );

    let page: BlogPostsResponse = decode(&body);
    assert_eq!(page.posts.len(), 5);
    assert_eq!(page.pagination.total_pages, 6);
}

#[tokio::test]
async fn empty_collection_yields_empty_page() {
    let app = router(StaticSource(Vec::new()));

    let (status, _, body) = get(&app, "/api/blog/posts").await;
    assert_eq!(status, StatusCode::OK);

    let page: BlogPostsResponse = decode(&body);
    assert!(page.posts.is_empty());
    assert!(page.month_groups.is_empty());
    assert!(!page.pagination.has_more);
    assert!(!page.pagination.has_previous);
    assert_eq!(page.pagination.total_pages, 0);
}

#[tokio::test]
async fn source_failure_returns_generic_error() {
    let app = router(BrokenSource);

    let (status, headers, body) = get(&app, "/api/blog/posts").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(headers.contains_key(REQUEST_ID_HEADER));
    let error: ErrorBody = decode(&body);
    assert_eq!(error.error, "Failed to fetch blog posts");
}

#[tokio::test]
async fn health_endpoint_is_empty_success() {
    let app = router(StaticSource(Vec::new()));

    let (status, _, body) = get(&app, "/_health").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn unknown_route_is_json_not_found() {
    let app = router(StaticSource(Vec::new()));

    let (status, _, body) = get(&app, "/api/blog/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorBody = decode(&body);
    assert_eq!(error.error, "Not found");
}
