//! Search and pagination state.
//!
//! The controller owns the query state and decides which responses may reach
//! the screen. Every fetch it starts gets a generation number; a response whose
//! ticket is older than the latest fetch is reported as stale so that a slow
//! earlier request can never overwrite a newer one.

use crate::api::{AnimeQuery, ApiError};
use shared::{AnimePage, AnimeRecord, Filters};
use tracing::{debug, warn};

/// Pagination direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

impl PageDirection {
    pub fn delta(self) -> i64 {
        match self {
            PageDirection::Previous => -1,
            PageDirection::Next => 1,
        }
    }
}

/// Page position plus the active filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    pub filters: Filters,
}

impl QueryState {
    pub fn to_query(&self) -> AnimeQuery {
        AnimeQuery {
            page: self.page,
            size: self.page_size,
            sort_by: self.filters.sort_by,
            sort_order: self.filters.sort_order,
            search: self.filters.search.clone(),
            genre: self.filters.genre.clone(),
        }
    }
}

/// A started fetch: what to request and which generation it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: AnimeQuery,
}

/// Result of handing a response back to the controller
#[derive(Debug)]
pub enum FetchOutcome {
    Loaded {
        records: Vec<AnimeRecord>,
        has_more: bool,
    },
    Failed(ApiError),
    /// A newer fetch has started since this one; nothing should be shown
    Stale,
}

/// Search/pagination controller
#[derive(Debug)]
pub struct SearchController {
    state: QueryState,
    generation: u64,
    /// Whether the last loaded page was full
    has_more: bool,
}

impl SearchController {
    pub fn new(page_size: u32) -> Self {
        Self {
            state: QueryState {
                page: 1,
                page_size: page_size.max(1),
                filters: Filters::default(),
            },
            generation: 0,
            has_more: false,
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn page(&self) -> u32 {
        self.state.page
    }

    /// Start a new search from page 1 with the given filters
    pub fn perform_search(&mut self, filters: Filters) -> FetchTicket {
        self.state.page = 1;
        self.state.filters = filters;
        self.start_fetch()
    }

    /// Move one page in `direction` keeping the filters
    ///
    /// Returns `None` when that would go before the first page.
    pub fn change_page(&mut self, direction: PageDirection) -> Option<FetchTicket> {
        let target = i64::from(self.state.page) + direction.delta();
        if target < 1 {
            warn!(page = self.state.page, "Already on the first page");
            return None;
        }

        self.state.page = u32::try_from(target).ok()?;
        Some(self.start_fetch())
    }

    /// Accept or discard the result of a fetch
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<AnimePage, ApiError>,
    ) -> FetchOutcome {
        if !self.is_current(ticket) {
            debug!(
                generation = ticket.generation,
                latest = self.generation,
                "Discarding stale response"
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(page) => {
                let records = page.data;
                self.has_more = records.len() == self.state.page_size as usize;
                debug!(
                    page = self.state.page,
                    records = records.len(),
                    has_more = self.has_more,
                    "Page loaded"
                );
                FetchOutcome::Loaded {
                    records,
                    has_more: self.has_more,
                }
            }
            Err(e) => FetchOutcome::Failed(e),
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    pub fn prev_enabled(&self) -> bool {
        self.state.page > 1
    }

    pub fn next_enabled(&self) -> bool {
        self.has_more
    }

    fn start_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        debug!(
            generation = self.generation,
            page = self.state.page,
            "Starting fetch"
        );
        FetchTicket {
            generation: self.generation,
            query: self.state.to_query(),
        }
    }
}
