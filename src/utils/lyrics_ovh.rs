//! Utilities for fetching lyrics from the lyrics.ovh API.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serenity::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Errors that can occur while fetching lyrics.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The song name did not split into an artist and a title.
    #[error("Song name must contain at least artist and song title")]
    InvalidQuery,

    /// The provider answered with a non-200 status.
    #[error("Failed to fetch lyrics: {0}")]
    HttpError(StatusCode),

    /// The request never got an HTTP answer (timeout, DNS, connection reset).
    #[error("Failed to fetch lyrics: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("Unable to parse lyrics response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The response parsed but carried no lyrics.
    #[error("No lyrics found")]
    NotFound,

    /// The configured endpoint cannot take path segments.
    #[error("Invalid lyrics endpoint: {0}")]
    Endpoint(String),
}

/// An artist/title pair, both guaranteed non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongQuery {
    artist: String,
    title: String,
}

impl SongQuery {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Result<Self, FetchError> {
        let artist = artist.into().trim().to_string();
        let title = title.into().trim().to_string();

        if artist.is_empty() || title.is_empty() {
            return Err(FetchError::InvalidQuery);
        }

        Ok(Self { artist, title })
    }

    /// Splits free text into a query: the first word is the artist, the
    /// remaining words (joined by single spaces) are the title.
    pub fn parse(text: &str) -> Result<Self, FetchError> {
        let mut words = text.split_whitespace();
        let artist = words.next().ok_or(FetchError::InvalidQuery)?;
        let title = words.collect::<Vec<_>>().join(" ");

        Self::new(artist, title)
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Lyrics for one song, as handed to the formatter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LyricsRecord {
    pub lyrics: String,
    pub artist: String,
    pub title: String,
    /// Public page for the lyrics, not the API endpoint.
    pub source_url: String,
    /// Empty when the provider has no artwork.
    pub album_art: String,
    /// Empty when the provider has no release year.
    pub album_year: String,
}

/// Response body from the provider.
///
/// The live API answers with a flat `{"lyrics": ...}` object (or `{"error": ...}`),
/// older clients expect the `{"data": [{"lyrics": ...}]}` wrapper. Both are accepted.
#[derive(Debug, Default, Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    lyrics: Option<String>,
    #[serde(default)]
    data: Option<Vec<ProviderEntry>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderEntry {
    #[serde(default)]
    lyrics: Option<String>,
}

impl ProviderResponse {
    fn into_lyrics(self) -> Option<String> {
        self.lyrics
            .or_else(|| self.data.and_then(|entries| entries.into_iter().next()?.lyrics))
            .filter(|lyrics| !lyrics.trim().is_empty())
    }
}

/// The seam between the command and whatever serves lyrics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    async fn fetch(&self, query: &SongQuery) -> Result<LyricsRecord, FetchError>;
}

/// lyrics.ovh client.
pub struct LyricsOvh {
    client: Client,
    api_url: Url,
    site_url: String,
}

impl LyricsOvh {
    pub fn new(client: Client, api_url: Url, site_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url,
            site_url: site_url.into(),
        }
    }

    /// Builds `<api_url>/<artist>/<title>` with both segments percent-encoded.
    ///
    /// `.` and `..` (also as `%2E`) are dot segments to URL parsers and would
    /// be collapsed, so a query made of them has no address and is rejected.
    fn lyrics_url(&self, query: &SongQuery) -> Result<Url, FetchError> {
        if is_dot_segment(query.artist()) || is_dot_segment(query.title()) {
            return Err(FetchError::InvalidQuery);
        }

        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Endpoint(self.api_url.to_string()))?
            .pop_if_empty()
            .push(query.artist())
            .push(query.title());

        Ok(url)
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

#[async_trait]
impl LyricsProvider for LyricsOvh {
    async fn fetch(&self, query: &SongQuery) -> Result<LyricsRecord, FetchError> {
        let url = self.lyrics_url(query)?;
        info!("Fetching lyrics for '{}' by '{}'", query.title(), query.artist());
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Lyrics provider answered {} for '{}'", status, query.title());
            return Err(FetchError::HttpError(status));
        }

        let body = response.text().await?;
        let parsed: ProviderResponse = serde_json::from_str(&body)?;

        if let Some(error) = &parsed.error {
            debug!("Lyrics provider reported: {}", error);
        }

        let lyrics = parsed.into_lyrics().ok_or(FetchError::NotFound)?;

        Ok(LyricsRecord {
            lyrics: lyrics.replace("\r\n", "\n"),
            artist: query.artist().to_string(),
            title: query.title().to_string(),
            source_url: self.site_url.clone(),
            album_art: String::new(),
            album_year: String::new(),
        })
    }
}
