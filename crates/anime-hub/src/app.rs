//! Application state and command handlers.
//!
//! `AnimeHub` is the single owned object a front end drives. It holds the API
//! client, the credential store, the search controller and the screen, and
//! exposes one async method per user action.

use crate::api::{ApiClient, ApiError};
use crate::controller::{FetchOutcome, FetchTicket, PageDirection, SearchController};
use crate::render::{DetailView, Screen};
use anyhow::{Context, Result};
use shared::{AnimeRecord, Config, CredentialStore, Filters};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch anime data. Please check your API key and try again.";
pub const CONFIGURE_KEY_MESSAGE: &str =
    "Please configure your API key in settings to use the application.";
pub const INVALID_KEY_MESSAGE: &str = "Please enter a valid API key.";
pub const KEY_SAVED_MESSAGE: &str = "API key saved successfully!";
pub const KEY_CLEARED_MESSAGE: &str = "API key removed.";

/// Anime Hub application
pub struct AnimeHub {
    client: ApiClient,
    credentials: CredentialStore,
    controller: SearchController,
    screen: Screen,
    /// Current values of the filter controls
    filters: Filters,
    /// Records behind the cards currently shown
    records: Vec<AnimeRecord>,
}

impl AnimeHub {
    /// Build the application, restoring the saved API key if there is one
    pub fn new(config: &Config, credentials: CredentialStore) -> Result<Self> {
        let mut client = ApiClient::from_config(config)?;

        let stored = credentials
            .get()
            .context("Failed to read stored API key")?;
        let credential = stored.or_else(|| {
            let fallback = config.api.default_key.trim();
            (!fallback.is_empty()).then(|| fallback.to_string())
        });
        client.set_credential(credential);

        let screen = Screen::new(
            Duration::from_secs(config.ui.error_display_seconds),
            Duration::from_secs(config.ui.success_display_seconds),
        );

        Ok(Self {
            client,
            credentials,
            controller: SearchController::new(config.ui.page_size),
            screen,
            filters: Filters::default(),
            records: Vec::new(),
        })
    }

    /// Initial load: genres, then either the first page or the key prompt
    pub async fn start(&mut self) {
        self.load_genres().await;

        if self.client.has_credential() {
            self.perform_search().await;
        } else {
            info!("No API key configured");
            self.screen.show_error(CONFIGURE_KEY_MESSAGE);
            self.screen.open_settings();
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn controller(&self) -> &SearchController {
        &self.controller
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Filter controls; changes take effect on the next `perform_search`
    pub fn filters_mut(&mut self) -> &mut Filters {
        &mut self.filters
    }

    /// Search from page 1 with the current filters
    pub async fn perform_search(&mut self) {
        let ticket = self.controller.perform_search(self.filters.clone());
        self.fetch_anime(ticket).await;
    }

    /// Go to the previous or next page with unchanged filters
    pub async fn change_page(&mut self, direction: PageDirection) {
        if let Some(ticket) = self.controller.change_page(direction) {
            self.fetch_anime(ticket).await;
        }
    }

    async fn fetch_anime(&mut self, ticket: FetchTicket) {
        self.screen.show_loading();
        self.screen.hide_error();

        let result = self.client.fetch_anime(&ticket.query).await;

        match self.controller.complete(&ticket, result) {
            FetchOutcome::Loaded { records, has_more } => {
                self.screen.display_results(&records);
                self.screen.update_pagination(
                    self.controller.page(),
                    self.controller.prev_enabled(),
                    has_more,
                );
                self.records = records;
            }
            FetchOutcome::Failed(e) => {
                warn!(error = %e, page = ticket.query.page, "Fetch failed");
                if e.needs_credential() {
                    self.screen.open_settings();
                }
                self.records.clear();
                self.screen.show_error(FETCH_FAILED_MESSAGE);
            }
            FetchOutcome::Stale => return,
        }

        self.screen.hide_loading();
    }

    /// Fill the genre list; failures are logged and leave it empty
    pub async fn load_genres(&mut self) {
        match self.client.fetch_genres().await {
            Ok(genres) => {
                debug!(count = genres.len(), "Genres loaded");
                self.screen.set_genres(genres);
            }
            Err(e) => warn!(error = %e, "Failed to load genres"),
        }
    }

    /// Save a new API key and search again
    ///
    /// A blank key is refused with an error banner and `Ok(false)`. Storage
    /// failures are returned as errors.
    pub async fn save_credential(&mut self, value: &str) -> Result<bool> {
        let key = value.trim();
        if key.is_empty() {
            self.screen.show_error(INVALID_KEY_MESSAGE);
            return Ok(false);
        }

        self.credentials
            .set(key)
            .context("Failed to persist API key")?;
        self.client.set_credential(Some(key.to_string()));

        self.screen.close_settings();
        self.screen.show_success(KEY_SAVED_MESSAGE);

        if self.screen.genres().is_empty() {
            self.load_genres().await;
        }
        self.perform_search().await;
        Ok(true)
    }

    /// Forget the stored API key
    pub fn clear_credential(&mut self) -> Result<()> {
        self.credentials
            .clear()
            .context("Failed to remove API key")?;
        self.client.set_credential(None);
        self.screen.show_success(KEY_CLEARED_MESSAGE);
        self.screen.open_settings();
        Ok(())
    }

    /// Detail view of the card at `index` (0-based) on the current page
    pub fn show_details(&self, index: usize) -> Option<DetailView> {
        self.records.get(index).map(DetailView::from_record)
    }

    /// Detail view of a record fetched by catalog id
    pub async fn lookup_by_id(&self, id: &str) -> Result<DetailView, ApiError> {
        let record = self.client.fetch_by_id(id).await?;
        Ok(DetailView::from_record(&record))
    }

    /// Detail view of the record at a given ranking
    pub async fn lookup_by_ranking(&self, rank: u32) -> Result<DetailView, ApiError> {
        let record = self.client.fetch_by_ranking(rank).await?;
        Ok(DetailView::from_record(&record))
    }
}
