use axum::{
    Json,
    extract::{RawQuery, State},
};
use folio_api_types::{BlogPostsResponse, params};

use crate::application::posts::PostsQuery;

use super::{HttpState, error::ApiError};

/// Query string of `GET /api/blog/posts`. Values stay raw so malformed
/// numbers fall back to defaults instead of rejecting the request.
/// A repeated key keeps its first value; unknown keys are ignored.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PostsParams {
    cursor: Option<String>,
    limit: Option<String>,
    direction: Option<String>,
    locale: Option<String>,
}

impl PostsParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let mut parsed = Self::default();
        let Some(raw) = raw else {
            return parsed;
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                params::CURSOR => &mut parsed.cursor,
                params::LIMIT => &mut parsed.limit,
                params::DIRECTION => &mut parsed.direction,
                params::LOCALE => &mut parsed.locale,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        parsed
    }
}

impl From<PostsParams> for PostsQuery {
    fn from(params: PostsParams) -> Self {
        PostsQuery {
            cursor: params.cursor,
            limit: params.limit,
            direction: params.direction,
            locale: params.locale,
        }
    }
}

pub async fn list_posts(
    State(state): State<HttpState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<BlogPostsResponse>, ApiError> {
    let query = PostsQuery::from(PostsParams::parse(raw.as_deref()));
    state
        .posts
        .page(&query)
        .await
        .map(Json)
        .map_err(|err| ApiError::fetch_failed("infra::http::blog::list_posts", &err))
}
