//! HTTP surface: the posts endpoint plus health and request logging.

pub mod blog;
pub mod error;
mod middleware;

use std::sync::Arc;

use axum::{
    Router,
    http::{StatusCode, Uri},
    middleware as axum_middleware,
    routing::get,
};
use folio_api_types::POSTS_PATH;

use crate::application::posts::BlogPostsService;

use self::error::ApiError;
use self::middleware::{log_responses, set_request_context};

pub use self::middleware::{REQUEST_ID_HEADER, RequestContext};

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<BlogPostsService>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route(POSTS_PATH, get(blog::list_posts))
        .route("/_health", get(health))
        .fallback(not_found)
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found("infra::http::fallback", uri.path())
}
