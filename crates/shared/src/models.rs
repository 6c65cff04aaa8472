//! Data models for the catalog.
//!
//! These types mirror the JSON returned by the anime-db API. Every field is
//! optional on the wire; the renderer supplies fallbacks.

use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};

/// One anime entry as received from the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimeRecord {
    #[serde(
        rename = "_id",
        alias = "id",
        default,
        deserialize_with = "deserialize_id"
    )]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub ranking: Option<i64>,
    #[serde(rename = "type", default)]
    pub anime_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Response body of the anime list endpoint
///
/// Entries that are not record objects are skipped so one broken entry does
/// not hide the rest of the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimePage {
    #[serde(default, deserialize_with = "deserialize_records")]
    pub data: Vec<AnimeRecord>,
}

/// `null` decodes the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// Catalog ids arrive as strings or numbers
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(|id| match id {
        RawId::Text(text) => text,
        RawId::Integer(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    }))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecord {
    Record(AnimeRecord),
    Other(IgnoredAny),
}

fn deserialize_records<'de, D>(deserializer: D) -> Result<Vec<AnimeRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<RawRecord> = null_as_default(deserializer)?;
    let total = raw.len();
    let records: Vec<AnimeRecord> = raw
        .into_iter()
        .filter_map(|entry| match entry {
            RawRecord::Record(record) => Some(record),
            RawRecord::Other(_) => None,
        })
        .collect();
    if records.len() < total {
        tracing::warn!(
            skipped = total - records.len(),
            "Skipped malformed catalog entries"
        );
    }
    Ok(records)
}

/// Field the catalog sorts by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Ranking,
    Title,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Ranking => "ranking",
            SortBy::Title => "title",
        }
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortBy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ranking" => Ok(SortBy::Ranking),
            "title" => Ok(SortBy::Title),
            _ => Err(anyhow::anyhow!("Invalid sort field: {}", s)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(anyhow::anyhow!("Invalid sort order: {}", s)),
        }
    }
}

/// Current values of the search, genre and sort controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl Filters {
    /// Builds filters from raw control values; blank text counts as unset
    pub fn new(search: &str, genre: &str, sort_by: SortBy, sort_order: SortOrder) -> Self {
        Self {
            search: non_blank(search),
            genre: non_blank(genre),
            sort_by,
            sort_order,
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_catalog_json() {
        let json = r#"{
            "_id": "16498",
            "title": "Attack on Titan",
            "alternativeTitles": ["Shingeki no Kyojin"],
            "ranking": 106,
            "genres": ["Action", "Award Winning", "Drama", "Suspense"],
            "episodes": 25,
            "hasEpisode": true,
            "image": "https://cdn.myanimelist.net/images/anime/10/47347.webp",
            "status": "Finished Airing",
            "synopsis": "Centuries ago...",
            "type": "TV"
        }"#;

        let record: AnimeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id.as_deref(), Some("16498"));
        assert_eq!(record.ranking, Some(106));
        assert_eq!(record.anime_type.as_deref(), Some("TV"));
        assert_eq!(record.genres.len(), 4);
        assert_eq!(record.episodes, Some(25));
    }

    #[test]
    fn test_sparse_record() {
        let record: AnimeRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, AnimeRecord::default());

        let record: AnimeRecord =
            serde_json::from_str(r#"{"title": null, "ranking": null}"#).unwrap();
        assert_eq!(record.title, None);
        assert_eq!(record.ranking, None);
    }

    #[test]
    fn test_page_without_data() {
        let page: AnimePage = serde_json::from_str(r#"{"meta": {"page": 1}}"#).unwrap();
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_null_data_is_empty_page() {
        let page: AnimePage = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_null_genres_is_empty_list() {
        let page: AnimePage = serde_json::from_str(
            r#"{"data": [{"_id": "1", "genres": null}, {"_id": "2", "genres": ["X"]}]}"#,
        )
        .unwrap();
        assert_eq!(page.data.len(), 2);
        assert!(page.data[0].genres.is_empty());
        assert_eq!(page.data[1].genres, vec!["X".to_string()]);
    }

    #[test]
    fn test_numeric_id() {
        let page: AnimePage = serde_json::from_str(r#"{"data": [{"_id": 16498}]}"#).unwrap();
        assert_eq!(page.data[0].id.as_deref(), Some("16498"));

        let record: AnimeRecord = serde_json::from_str(r#"{"_id": null}"#).unwrap();
        assert_eq!(record.id, None);
    }

    #[test]
    fn test_broken_entry_is_skipped() {
        let page: AnimePage = serde_json::from_str(
            r#"{"data": [
                {"title": "Monster"},
                {"title": "Broken", "ranking": "first"},
                null,
                {"title": "Mushishi"}
            ]}"#,
        )
        .unwrap();
        let titles: Vec<_> = page.data.iter().filter_map(|r| r.title.as_deref()).collect();
        assert_eq!(titles, vec!["Monster", "Mushishi"]);
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("title".parse::<SortBy>().unwrap(), SortBy::Title);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("popularity".parse::<SortBy>().is_err());
        assert_eq!(SortBy::default().to_string(), "ranking");
        assert_eq!(SortOrder::default().to_string(), "asc");
    }

    #[test]
    fn test_filters_blank_is_unset() {
        let filters = Filters::new("  naruto ", "   ", SortBy::Ranking, SortOrder::Asc);
        assert_eq!(filters.search.as_deref(), Some("naruto"));
        assert_eq!(filters.genre, None);
    }
}
