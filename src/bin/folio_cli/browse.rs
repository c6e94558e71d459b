use folio::api_types::{MonthGroup, params};
use folio::client::{
    ClientError, ClientOptions, HttpTransport, LoadOutcome, Location, MemoryLocation,
    PaginationClient, PaginationState, PostsTransport,
};
use reqwest::Url;
use thiserror::Error;

use crate::args::BrowseArgs;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("site URL is required (use --site or FOLIO_SITE_URL)")]
    MissingSite,
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("server error: {0}")]
    Server(String),
}

/// Everything the browse command shows once loading stops.
#[derive(Debug)]
pub struct BrowseReport {
    pub month_groups: Vec<MonthGroup>,
    pub total_count: usize,
    pub has_more: bool,
    pub resume: Url,
}

impl BrowseReport {
    fn from_state(state: PaginationState, resume: Url) -> Self {
        Self {
            month_groups: state.month_groups,
            total_count: state.total_count,
            has_more: state.has_more,
            resume,
        }
    }
}

pub fn start_url(site: &str, args: &BrowseArgs) -> Result<Url, CliError> {
    let mut url = Url::parse(site)?.join(&args.path)?;
    url.set_query(None);
    if let Some(cursor) = args.cursor.as_deref().filter(|c| !c.is_empty()) {
        url.query_pairs_mut().append_pair(params::CURSOR, cursor);
    }
    Ok(url)
}

pub async fn handle(site: &str, args: &BrowseArgs) -> Result<BrowseReport, CliError> {
    let transport = HttpTransport::new(site)?;
    run(transport, start_url(site, args)?, args).await
}

pub async fn run<T: PostsTransport>(
    transport: T,
    start: Url,
    args: &BrowseArgs,
) -> Result<BrowseReport, CliError> {
    let client = PaginationClient::new(
        transport,
        MemoryLocation::new(start),
        Vec::new(),
        ClientOptions {
            limit: args.limit,
            locale: args.locale.clone(),
        },
    );

    let first = match client.hydrate().await {
        LoadOutcome::Skipped => client.refresh().await,
        outcome => outcome,
    };
    ensure_loaded(&client, first)?;

    for _ in 1..args.pages {
        match client.load_more().await {
            LoadOutcome::Skipped => break,
            outcome => ensure_loaded(&client, outcome)?,
        }
    }

    Ok(BrowseReport::from_state(
        client.state(),
        client.location().current(),
    ))
}

fn ensure_loaded<T: PostsTransport, L: Location>(
    client: &PaginationClient<T, L>,
    outcome: LoadOutcome,
) -> Result<(), CliError> {
    if outcome == LoadOutcome::Failed {
        let message = client
            .state()
            .error
            .unwrap_or_else(|| "request failed".to_string());
        return Err(CliError::Server(message));
    }
    Ok(())
}
