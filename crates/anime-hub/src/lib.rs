//! Anime Hub library: a cached, paginated client for the anime-db catalog.
//!
//! The pieces are layered leaf-first: a time-bounded response cache, the API
//! client that fetches through it, the search/pagination controller, the
//! renderer that turns records into screen state, and `AnimeHub`, which wires
//! them together behind plain command handlers.

pub mod api;
pub mod app;
pub mod cache;
pub mod controller;
pub mod render;

pub use api::{AnimeQuery, ApiClient, ApiError};
pub use app::AnimeHub;
pub use cache::ResponseCache;
pub use controller::{FetchOutcome, FetchTicket, PageDirection, QueryState, SearchController};
pub use render::{AnimeCard, DetailView, ResultsView, Screen};
