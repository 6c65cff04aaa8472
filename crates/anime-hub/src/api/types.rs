//! Request parameters and auxiliary response shapes for the anime-db API.

use serde::Deserialize;
use shared::{SortBy, SortOrder};
use std::collections::BTreeMap;

/// Query parameters; `None` values are left out of the request.
///
/// The ordered map keeps the encoded query string stable, so the same logical
/// request always produces the same cache key.
pub type QueryParams = BTreeMap<String, Option<String>>;

/// Parameters of one `/anime` list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimeQuery {
    pub page: u32,
    pub size: u32,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub search: Option<String>,
    pub genre: Option<String>,
}

impl AnimeQuery {
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert("page".to_string(), Some(self.page.to_string()));
        params.insert("size".to_string(), Some(self.size.to_string()));
        params.insert("sortBy".to_string(), Some(self.sort_by.to_string()));
        params.insert("sortOrder".to_string(), Some(self.sort_order.to_string()));
        params.insert("search".to_string(), self.search.clone());
        params.insert("genres".to_string(), self.genre.clone());
        params
    }
}

/// Entry of the `/genre` list, either a bare name or `{"_id": name}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GenreEntry {
    Name(String),
    Object {
        #[serde(rename = "_id")]
        id: String,
    },
}

impl GenreEntry {
    pub fn into_name(self) -> String {
        match self {
            GenreEntry::Name(name) => name,
            GenreEntry::Object { id } => id,
        }
    }
}

/// Encode parameters as `k=v&k=v` in key order, skipping unset values
///
/// Values are form-urlencoded: spaces become `+`, a literal `+` becomes `%2B`.
pub fn encode_query(params: &QueryParams) -> String {
    params
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| format!("{}={}", form_encode(key), form_encode(v)))
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn form_encode(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}
