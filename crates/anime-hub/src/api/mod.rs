//! anime-db API client.
//!
//! Requests carry the RapidAPI key and host headers and are served from the
//! response cache when an identical request was made recently.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::*;
