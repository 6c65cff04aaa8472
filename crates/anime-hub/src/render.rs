//! Screen state and its text rendering.
//!
//! Records become cards and detail views with fallback text for missing
//! fields. `Screen` holds everything currently visible: loading indicator,
//! results, pagination bar, error banner, success toasts and the settings
//! prompt. Notifications carry their own lifetime and disappear lazily when
//! the screen is read after they expire.

use shared::AnimeRecord;
use std::fmt;
use std::time::{Duration, Instant};

pub const NO_RESULTS_MESSAGE: &str = "No anime found. Try adjusting your search criteria.";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/300x400?text=No+Image";
pub const SETTINGS_PROMPT: &str = "Enter your RapidAPI key with `key <value>`.";

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN: &str = "Unknown";
const NOT_AVAILABLE: &str = "N/A";
const NO_SYNOPSIS: &str = "No synopsis available.";

/// Genres shown on a card
pub const CARD_GENRE_LIMIT: usize = 3;

/// One result card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimeCard {
    pub title: String,
    pub ranking: String,
    pub anime_type: String,
    pub genres: Vec<String>,
    pub image_url: String,
}

impl AnimeCard {
    pub fn from_record(record: &AnimeRecord) -> Self {
        Self {
            title: text_or(&record.title, UNKNOWN_TITLE),
            ranking: ranking_label(record.ranking),
            anime_type: text_or(&record.anime_type, UNKNOWN),
            genres: record
                .genres
                .iter()
                .take(CARD_GENRE_LIMIT)
                .cloned()
                .collect(),
            image_url: text_or(&record.image, PLACEHOLDER_IMAGE_URL),
        }
    }

    /// Image to show when `image_url` fails to load
    pub fn fallback_image_url(&self) -> &'static str {
        PLACEHOLDER_IMAGE_URL
    }
}

/// Full description of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub ranking: String,
    pub anime_type: String,
    pub episodes: String,
    pub status: String,
    pub synopsis: String,
}

impl DetailView {
    pub fn from_record(record: &AnimeRecord) -> Self {
        Self {
            title: text_or(&record.title, UNKNOWN_TITLE),
            ranking: ranking_label(record.ranking),
            anime_type: text_or(&record.anime_type, UNKNOWN),
            episodes: record
                .episodes
                .map(|n| n.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            status: text_or(&record.status, UNKNOWN),
            synopsis: text_or(&record.synopsis, NO_SYNOPSIS),
        }
    }
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f)?;
        writeln!(f, "Ranking: #{}", self.ranking)?;
        writeln!(f, "Type: {}", self.anime_type)?;
        writeln!(f, "Episodes: {}", self.episodes)?;
        writeln!(f, "Status: {}", self.status)?;
        writeln!(f)?;
        write!(f, "{}", self.synopsis)
    }
}

/// Content of the results area
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultsView {
    /// Nothing shown (initial state, or cleared while loading)
    #[default]
    Blank,
    NoResults,
    Cards(Vec<AnimeCard>),
}

/// Map records to cards, in input order
pub fn render_results(records: &[AnimeRecord]) -> ResultsView {
    if records.is_empty() {
        return ResultsView::NoResults;
    }
    ResultsView::Cards(records.iter().map(AnimeCard::from_record).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Success,
}

/// A message that hides itself after `ttl`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    shown_at: Instant,
    ttl: Duration,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>, ttl: Duration) -> Self {
        Self::shown_at(kind, message, ttl, Instant::now())
    }

    pub fn shown_at(
        kind: NotificationKind,
        message: impl Into<String>,
        ttl: Duration,
        now: Instant,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            shown_at: now,
            ttl,
        }
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < self.ttl
    }
}

/// Pagination bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationView {
    pub visible: bool,
    pub page: u32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl PaginationView {
    pub fn label(&self) -> String {
        format!("Page {}", self.page)
    }
}

/// Everything currently on screen
#[derive(Debug, Clone)]
pub struct Screen {
    loading: bool,
    results: ResultsView,
    pagination: PaginationView,
    error: Option<Notification>,
    toasts: Vec<Notification>,
    settings_open: bool,
    genres: Vec<String>,
    error_ttl: Duration,
    success_ttl: Duration,
}

impl Screen {
    pub fn new(error_ttl: Duration, success_ttl: Duration) -> Self {
        Self {
            loading: false,
            results: ResultsView::Blank,
            pagination: PaginationView::default(),
            error: None,
            toasts: Vec::new(),
            settings_open: false,
            genres: Vec::new(),
            error_ttl,
            success_ttl,
        }
    }

    /// Show the spinner and clear previous results
    pub fn show_loading(&mut self) {
        self.loading = true;
        self.results = ResultsView::Blank;
    }

    pub fn hide_loading(&mut self) {
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn display_results(&mut self, records: &[AnimeRecord]) {
        self.results = render_results(records);
    }

    pub fn results(&self) -> &ResultsView {
        &self.results
    }

    pub fn update_pagination(&mut self, page: u32, prev_enabled: bool, next_enabled: bool) {
        self.pagination = PaginationView {
            visible: true,
            page,
            prev_enabled,
            next_enabled,
        };
    }

    pub fn pagination(&self) -> PaginationView {
        self.pagination
    }

    /// Show the error banner, replacing any earlier one
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(Notification::new(
            NotificationKind::Error,
            message,
            self.error_ttl,
        ));
    }

    pub fn hide_error(&mut self) {
        self.error = None;
    }

    pub fn show_success(&mut self, message: impl Into<String>) {
        self.show_success_at(message, Instant::now());
    }

    /// Add a toast shown from `now`, dropping toasts that have already expired
    pub fn show_success_at(&mut self, message: impl Into<String>, now: Instant) {
        self.prune_notifications(now);
        self.toasts.push(Notification::shown_at(
            NotificationKind::Success,
            message,
            self.success_ttl,
            now,
        ));
    }

    /// Error banner text if it has not yet timed out
    pub fn error_message_at(&self, now: Instant) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|n| n.is_visible_at(now))
            .map(|n| n.message.as_str())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message_at(Instant::now())
    }

    /// Success toasts still visible at `now`
    pub fn toasts_at(&self, now: Instant) -> Vec<&str> {
        self.toasts
            .iter()
            .filter(|n| n.is_visible_at(now))
            .map(|n| n.message.as_str())
            .collect()
    }

    /// Forget notifications that have timed out
    pub fn prune_notifications(&mut self, now: Instant) {
        if self.error.as_ref().is_some_and(|n| !n.is_visible_at(now)) {
            self.error = None;
        }
        self.toasts.retain(|n| n.is_visible_at(now));
    }

    pub fn open_settings(&mut self) {
        self.settings_open = true;
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn set_genres(&mut self, genres: Vec<String>) {
        self.genres = genres;
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    fn fmt_at(&self, f: &mut fmt::Formatter<'_>, now: Instant) -> fmt::Result {
        if self.settings_open {
            writeln!(f, "[settings] {}", SETTINGS_PROMPT)?;
        }
        if let Some(message) = self.error_message_at(now) {
            writeln!(f, "[error] {}", message)?;
        }
        for toast in self.toasts_at(now) {
            writeln!(f, "[ok] {}", toast)?;
        }
        if self.loading {
            writeln!(f, "Loading...")?;
        }

        match &self.results {
            ResultsView::Blank => {}
            ResultsView::NoResults => writeln!(f, "{}", NO_RESULTS_MESSAGE)?,
            ResultsView::Cards(cards) => {
                for (index, card) in cards.iter().enumerate() {
                    writeln!(f, "{}", CardLine { index, card })?;
                }
            }
        }

        if self.pagination.visible {
            let prev = if self.pagination.prev_enabled { "< prev" } else { "      " };
            let next = if self.pagination.next_enabled { "next >" } else { "      " };
            writeln!(f, "{}  {}  {}", prev, self.pagination.label(), next)?;
        }
        Ok(())
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_at(f, Instant::now())
    }
}

struct CardLine<'a> {
    index: usize,
    card: &'a AnimeCard,
}

impl fmt::Display for CardLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card = self.card;
        writeln!(f, "[{}] {}", self.index + 1, card.title)?;
        writeln!(f, "    #{} | {}", card.ranking, card.anime_type)?;
        if !card.genres.is_empty() {
            writeln!(f, "    {}", card.genres.join(", "))?;
        }
        write!(f, "    {}", card.image_url)
    }
}

fn text_or(value: &Option<String>, fallback: &str) -> String {
    match value.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => fallback.to_string(),
    }
}

fn ranking_label(ranking: Option<i64>) -> String {
    ranking
        .map(|r| r.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, genres: &[&str]) -> AnimeRecord {
        AnimeRecord {
            id: Some(title.to_lowercase()),
            title: Some(title.to_string()),
            ranking: Some(5),
            anime_type: Some("TV".to_string()),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            image: Some(format!("https://img.example/{}.webp", title.to_lowercase())),
            ..Default::default()
        }
    }

    fn screen() -> Screen {
        Screen::new(Duration::from_secs(5), Duration::from_secs(3))
    }

    #[test]
    fn test_empty_list_renders_placeholder() {
        assert_eq!(render_results(&[]), ResultsView::NoResults);

        let rendered = format!("{}", {
            let mut s = screen();
            s.display_results(&[]);
            s
        });
        assert!(rendered.contains(NO_RESULTS_MESSAGE));
        assert!(!rendered.contains("[1]"));
    }

    #[test]
    fn test_one_card_per_record_in_order() {
        let records = vec![
            record("Monster", &["Drama", "Mystery", "Suspense", "Seinen"]),
            record("Mushishi", &["Adventure"]),
            record("Haikyuu", &[]),
        ];

        let ResultsView::Cards(cards) = render_results(&records) else {
            panic!("expected cards");
        };
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].title, "Monster");
        assert_eq!(cards[0].genres, vec!["Drama", "Mystery", "Suspense"]);
        assert_eq!(cards[1].title, "Mushishi");
        assert_eq!(cards[2].title, "Haikyuu");
        assert!(cards.iter().all(|c| c.genres.len() <= CARD_GENRE_LIMIT));
    }

    #[test]
    fn test_card_fallbacks() {
        let card = AnimeCard::from_record(&AnimeRecord::default());
        assert_eq!(card.title, "Unknown Title");
        assert_eq!(card.ranking, "N/A");
        assert_eq!(card.anime_type, "Unknown");
        assert_eq!(card.image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(card.fallback_image_url(), PLACEHOLDER_IMAGE_URL);
        assert!(card.genres.is_empty());
    }

    #[test]
    fn test_detail_view() {
        let mut full = record("Monster", &["Drama"]);
        full.episodes = Some(74);
        full.status = Some("Finished Airing".to_string());
        full.synopsis = Some("Dr. Kenzou Tenma...".to_string());

        let detail = DetailView::from_record(&full);
        assert_eq!(detail.episodes, "74");
        let text = detail.to_string();
        assert!(text.starts_with("Monster\n"));
        assert!(text.contains("Ranking: #5"));
        assert!(text.contains("Status: Finished Airing"));

        let sparse = DetailView::from_record(&AnimeRecord::default());
        assert_eq!(sparse.title, "Unknown Title");
        assert_eq!(sparse.ranking, "N/A");
        assert_eq!(sparse.episodes, "Unknown");
        assert_eq!(sparse.status, "Unknown");
        assert_eq!(sparse.synopsis, "No synopsis available.");
    }

    #[test]
    fn test_loading_clears_results() {
        let mut s = screen();
        s.display_results(&[record("Monster", &[])]);
        s.show_loading();
        assert!(s.is_loading());
        assert_eq!(s.results(), &ResultsView::Blank);

        s.display_results(&[record("Monster", &[])]);
        s.hide_loading();
        assert!(!s.is_loading());
        assert!(matches!(s.results(), ResultsView::Cards(cards) if cards.len() == 1));
    }

    #[test]
    fn test_notifications_expire() {
        let mut s = screen();
        let now = Instant::now();

        s.show_error("Failed");
        s.show_success("Saved");

        assert_eq!(s.error_message_at(now), Some("Failed"));
        assert_eq!(s.toasts_at(now), vec!["Saved"]);

        // Toast is gone after 3s, banner stays until 5s
        let later = now + Duration::from_secs(4);
        assert!(s.toasts_at(later).is_empty());
        assert_eq!(s.error_message_at(later), Some("Failed"));

        let much_later = now + Duration::from_secs(6);
        assert_eq!(s.error_message_at(much_later), None);

        s.prune_notifications(much_later);
        assert_eq!(s.error_message(), None);
    }

    #[test]
    fn test_expired_toasts_are_dropped() {
        let mut s = screen();
        let start = Instant::now();

        for i in 0..5 {
            s.show_success_at("API key saved successfully!", start + Duration::from_secs(4 * i));
        }

        assert_eq!(s.toasts.len(), 1);
        assert_eq!(
            s.toasts_at(start + Duration::from_secs(16)),
            vec!["API key saved successfully!"]
        );

        // Toasts inside the lifetime stack up
        s.show_success_at("API key removed.", start + Duration::from_secs(17));
        assert_eq!(s.toasts.len(), 2);
    }

    #[test]
    fn test_hide_error() {
        let mut s = screen();
        s.show_error("Failed");
        s.hide_error();
        assert_eq!(s.error_message(), None);
    }

    #[test]
    fn test_pagination_bar() {
        let mut s = screen();
        assert!(!s.pagination().visible);

        s.update_pagination(1, false, true);
        let text = s.to_string();
        assert!(text.contains("Page 1"));
        assert!(text.contains("next >"));
        assert!(!text.contains("< prev"));
    }
}
