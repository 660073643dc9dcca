//! Runtime configuration, read from the environment (after `.env` is loaded).

use std::env;
use std::time::Duration;

use humantime_serde::re::humantime;
use thiserror::Error;
use tracing::debug;
use url::Url;

const DEFAULT_LYRICS_API_URL: &str = "https://api.lyrics.ovh/v1/";
const DEFAULT_LYRICS_SITE_URL: &str = "https://lyrics.ovh";
const DEFAULT_HTTP_TIMEOUT: &str = "10s";
const DEFAULT_NOW_PLAYING_TIMEOUT: &str = "3s";

/// Errors raised while loading the configuration at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("{name} is not a valid URL: {source}")]
    Url {
        name: &'static str,
        source: url::ParseError,
    },

    #[error("{0} cannot be used as a base URL")]
    NotABase(&'static str),

    #[error("{name} is not a valid duration: {source}")]
    Duration {
        name: &'static str,
        source: humantime::DurationError,
    },

    #[error("Unknown now-playing source '{0}', expected 'presence' or 'spotify'")]
    UnknownSource(String),
}

/// Credentials for reading the bot owner's Spotify playback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Where the `/lyrics` command looks when no song name is given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NowPlayingSource {
    /// The invoking member's Discord "Listening to Spotify" presence.
    Presence,
    /// The Spotify Web API player endpoint, for the account owning the refresh token.
    Spotify(SpotifyCredentials),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub discord_token: String,
    pub lyrics_api_url: Url,
    pub lyrics_site_url: String,
    pub http_timeout: Duration,
    pub now_playing_timeout: Duration,
    pub now_playing: NowPlayingSource,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let discord_token = required("DISCORD_TOKEN")?;

        let lyrics_api_url = var("LYRICS_API_URL")
            .unwrap_or_else(|| DEFAULT_LYRICS_API_URL.to_string());
        let lyrics_api_url = Url::parse(&lyrics_api_url).map_err(|source| ConfigError::Url {
            name: "LYRICS_API_URL",
            source,
        })?;
        if lyrics_api_url.cannot_be_a_base() {
            return Err(ConfigError::NotABase("LYRICS_API_URL"));
        }

        let lyrics_site_url = var("LYRICS_SITE_URL")
            .unwrap_or_else(|| DEFAULT_LYRICS_SITE_URL.to_string());

        let http_timeout = parse_duration(
            "LYRICS_HTTP_TIMEOUT",
            var("LYRICS_HTTP_TIMEOUT").as_deref().unwrap_or(DEFAULT_HTTP_TIMEOUT),
        )?;
        let now_playing_timeout = parse_duration(
            "NOW_PLAYING_TIMEOUT",
            var("NOW_PLAYING_TIMEOUT")
                .as_deref()
                .unwrap_or(DEFAULT_NOW_PLAYING_TIMEOUT),
        )?;

        let source = var("NOW_PLAYING_SOURCE").unwrap_or_else(|| "presence".to_string());
        let now_playing = match source.trim().to_ascii_lowercase().as_str() {
            "presence" => NowPlayingSource::Presence,
            "spotify" => NowPlayingSource::Spotify(SpotifyCredentials {
                client_id: required("SPOTIFY_CLIENT_ID")?,
                client_secret: required("SPOTIFY_CLIENT_SECRET")?,
                refresh_token: required("SPOTIFY_REFRESH_TOKEN")?,
            }),
            _ => return Err(ConfigError::UnknownSource(source)),
        };

        debug!(
            "Loaded config: api={}, site={}, http_timeout={:?}, now_playing_timeout={:?}",
            lyrics_api_url, lyrics_site_url, http_timeout, now_playing_timeout
        );

        Ok(Self {
            discord_token,
            lyrics_api_url,
            lyrics_site_url,
            http_timeout,
            now_playing_timeout,
            now_playing,
        })
    }
}

fn parse_duration(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|source| ConfigError::Duration { name, source })
}
