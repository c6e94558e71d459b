//! Stateful pagination controller for the posts endpoint.
//!
//! The controller accumulates pages fetched through a [`PostsTransport`] and
//! mirrors its position into a [`Location`] so a reader can resume where they
//! left off. At most one fetch is in flight; overlapping calls are no-ops.

pub mod location;
pub mod state;
pub mod transport;

use std::sync::{Mutex, MutexGuard};

use folio_api_types::{Direction, PostMeta};
use tracing::{debug, warn};

use crate::application::pagination::DEFAULT_PAGE_LIMIT;
use crate::infra::lock::mutex_lock;

pub use self::location::{Location, MemoryLocation};
pub use self::state::{LoadStatus, PaginationState};
pub use self::transport::{ClientError, HttpTransport, PageQuery, PostsTransport};

/// What a load call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetched page was applied to the state.
    Applied,
    /// The fetch failed; the message is in [`PaginationState::error`].
    Failed,
    /// Nothing to load, or another load was in flight.
    Skipped,
    /// A reset happened while the fetch was in flight; the response was dropped.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Apply {
    Merge,
    Replace,
}

struct Ticket {
    generation: u64,
    query: PageQuery,
    apply: Apply,
}

struct Inner {
    state: PaginationState,
    generation: u64,
}

impl Inner {
    fn begin(&mut self, query: PageQuery, apply: Apply) -> Ticket {
        self.generation += 1;
        self.state.is_loading = true;
        Ticket {
            generation: self.generation,
            query,
            apply,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub limit: usize,
    pub locale: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            locale: "en".to_string(),
        }
    }
}

pub struct PaginationClient<T, L> {
    transport: T,
    location: L,
    options: ClientOptions,
    initial: Vec<PostMeta>,
    inner: Mutex<Inner>,
}

impl<T: PostsTransport, L: Location> PaginationClient<T, L> {
    /// Build page-one state from posts the caller already holds.
    ///
    /// When the location carries a cursor the state starts empty and
    /// [`hydrate`](Self::hydrate) fetches that position; `initial` is kept
    /// for [`reset`](Self::reset).
    pub fn new(transport: T, location: L, initial: Vec<PostMeta>, options: ClientOptions) -> Self {
        let options = ClientOptions {
            limit: options.limit.max(1),
            ..options
        };
        let state = match location::cursor_of(&location.current()) {
            Some(_) => PaginationState::default(),
            None => PaginationState::initial(&initial, options.limit),
        };
        Self {
            transport,
            location,
            options,
            initial,
            inner: Mutex::new(Inner {
                state,
                generation: 0,
            }),
        }
    }

    pub fn state(&self) -> PaginationState {
        self.lock("state").state.clone()
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    /// Replace-fetch the page named by the location's cursor when nothing is
    /// loaded locally.
    pub async fn hydrate(&self) -> LoadOutcome {
        let Some(cursor) = location::cursor_of(&self.location.current()) else {
            return LoadOutcome::Skipped;
        };

        let ticket = {
            let mut inner = self.lock("hydrate");
            if inner.state.is_loading || !inner.state.posts.is_empty() {
                return LoadOutcome::Skipped;
            }
            inner.begin(self.query(Some(cursor), Direction::Next), Apply::Replace)
        };
        self.complete(ticket).await
    }

    /// Append the next page to the accumulated posts.
    pub async fn load_more(&self) -> LoadOutcome {
        let ticket = {
            let mut inner = self.lock("load_more");
            if inner.state.is_loading || !inner.state.has_more {
                return LoadOutcome::Skipped;
            }
            let cursor = inner.state.next_cursor.clone();
            inner.begin(self.query(cursor, Direction::Next), Apply::Merge)
        };
        self.complete(ticket).await
    }

    /// Show the page before the current one, replacing the accumulated posts.
    pub async fn load_previous(&self) -> LoadOutcome {
        let ticket = {
            let mut inner = self.lock("load_previous");
            if inner.state.is_loading || !inner.state.has_previous {
                return LoadOutcome::Skipped;
            }
            let cursor = inner.state.prev_cursor.clone();
            inner.begin(self.query(cursor, Direction::Prev), Apply::Replace)
        };
        self.complete(ticket).await
    }

    /// Replace-fetch the first page from the server.
    pub async fn refresh(&self) -> LoadOutcome {
        let ticket = {
            let mut inner = self.lock("refresh");
            if inner.state.is_loading {
                return LoadOutcome::Skipped;
            }
            inner.begin(self.query(None, Direction::Next), Apply::Replace)
        };
        self.complete(ticket).await
    }

    /// Return to the initial page-one slice and drop the position from the location.
    /// A fetch still in flight is discarded when it lands.
    pub fn reset(&self) {
        // Held across the URL write so a landing response cannot interleave.
        let mut inner = self.lock("reset");
        inner.generation += 1;
        inner.state = PaginationState::initial(&self.initial, self.options.limit);

        let current = self.location.current();
        let stripped = location::without_position(&current);
        if stripped != current {
            self.location.replace(stripped);
        }
    }

    fn query(&self, cursor: Option<String>, direction: Direction) -> PageQuery {
        PageQuery {
            cursor,
            limit: self.options.limit,
            direction,
            locale: self.options.locale.clone(),
        }
    }

    async fn complete(&self, ticket: Ticket) -> LoadOutcome {
        let result = self.transport.fetch_page(&ticket.query).await;

        let mut inner = self.lock("complete");
        if inner.generation != ticket.generation {
            debug!(
                target = "folio::client",
                cursor = ticket.query.cursor.as_deref().unwrap_or(""),
                "Dropped response from before reset"
            );
            return LoadOutcome::Discarded;
        }
        inner.state.is_loading = false;

        match result {
            Ok(page) => {
                match ticket.apply {
                    Apply::Merge => inner.state.merge(page),
                    Apply::Replace => inner.state.replace(page),
                }
                // Location writes happen under the state lock, state before location.
                let current = self.location.current();
                self.location.replace(location::with_position(
                    &current,
                    inner.state.next_cursor.as_deref(),
                    inner.state.current_page,
                ));
                LoadOutcome::Applied
            }
            Err(err) => {
                warn!(
                    target = "folio::client",
                    direction = %ticket.query.direction,
                    cursor = ticket.query.cursor.as_deref().unwrap_or(""),
                    error = %err,
                    "Failed to load posts page"
                );
                inner.state.error = Some(err.to_string());
                LoadOutcome::Failed
            }
        }
    }

    fn lock(&self, op: &'static str) -> MutexGuard<'_, Inner> {
        mutex_lock(&self.inner, "client::pagination", op)
    }
}
