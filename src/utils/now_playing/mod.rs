//! Sources for the track a user is currently listening to.
//!
//! The `/lyrics` command only needs a single read of the now-playing state,
//! so every source sits behind the one-method [`TrackResolver`] trait.

/// Reads the invoking member's Discord presence.
pub mod presence;
/// Reads the Spotify Web API player for a configured account.
pub mod spotify;

pub use presence::PresenceResolver;
pub use spotify::SpotifyPlayerResolver;

use reqwest::StatusCode;
use serenity::async_trait;
use thiserror::Error;

/// Errors raised by a now-playing source.
#[derive(Error, Debug)]
pub enum NowPlayingError {
    #[error("API communication failure: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Unable to parse now-playing response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Now-playing source answered {0}")]
    Status(StatusCode),
}

/// A playing track, reduced to what a lyrics lookup needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackInfo {
    pub name: String,
    /// Credited artists, primary artist first.
    pub artists: Vec<String>,
}

impl TrackInfo {
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists
            .first()
            .map(|artist| artist.trim())
            .filter(|artist| !artist.is_empty())
    }

    /// `"<primary artist> <track name>"`, or `None` when either part is missing.
    pub fn query(&self) -> Option<String> {
        let artist = self.primary_artist()?;
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(format!("{artist} {name}"))
    }
}

/// A single-shot read of the now-playing state.
///
/// `Ok(None)` means nothing is playing. Implementations must not retry or
/// subscribe; the caller bounds the wait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackResolver: Send + Sync {
    async fn current_track(&self) -> Result<Option<TrackInfo>, NowPlayingError>;
}
