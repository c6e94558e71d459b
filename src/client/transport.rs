use async_trait::async_trait;
use folio_api_types::{BlogPostsResponse, Direction, ErrorBody, POSTS_PATH, params};
use reqwest::{Client, Url};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} (status {status})")]
    Status { status: u16, message: String },
    #[error("failed to parse body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Parameters of one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub cursor: Option<String>,
    pub limit: usize,
    pub direction: Direction,
    pub locale: String,
}

impl PageQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (params::LIMIT, self.limit.to_string()),
            (params::DIRECTION, self.direction.as_str().to_string()),
            (params::LOCALE, self.locale.clone()),
        ];
        if let Some(cursor) = self.cursor.as_ref() {
            pairs.insert(0, (params::CURSOR, cursor.clone()));
        }
        pairs
    }
}

/// Fetches pages from a posts endpoint.
#[async_trait]
pub trait PostsTransport: Send + Sync {
    async fn fetch_page(&self, query: &PageQuery) -> Result<BlogPostsResponse, ClientError>;
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    /// `site` is the server's base URL; the posts path is resolved against its root.
    pub fn new(site: &str) -> Result<Self, ClientError> {
        let endpoint = Url::parse(site)?.join(POSTS_PATH)?;
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn user_agent() -> &'static str {
        concat!("folio-client/", env!("CARGO_PKG_VERSION"))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url_for(&self, query: &PageQuery) -> Url {
        let mut url = self.endpoint.clone();
        url.set_query(None);
        {
            let mut qp = url.query_pairs_mut();
            for (key, value) in query.pairs() {
                qp.append_pair(key, &value);
            }
        }
        url
    }
}

#[async_trait]
impl PostsTransport for HttpTransport {
    async fn fetch_page(&self, query: &PageQuery) -> Result<BlogPostsResponse, ClientError> {
        let resp = self.client.get(self.url_for(query)).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|body| body.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}
