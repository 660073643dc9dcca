use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::utils::now_playing::TrackResolver;

/// Reasons a song name could not be worked out.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolutionError {
    /// Nothing is playing, or the now-playing source failed.
    #[error("No active track")]
    NoActiveTrack,

    /// The now-playing source did not answer in time.
    #[error("Timed out waiting for the current track")]
    Timeout,
}

/// Picks the song name for one invocation.
///
/// Non-empty explicit text wins and is returned as-is, without touching the resolver.
/// Otherwise the resolver gets at most `wait` to answer; dropping the
/// returned future cancels the pending read.
pub async fn resolve_query(
    explicit: Option<&str>,
    resolver: &dyn TrackResolver,
    wait: Duration,
) -> Result<String, ResolutionError> {
    if let Some(text) = explicit.filter(|text| !text.is_empty()) {
        debug!("Using explicit song name '{}'", text);
        return Ok(text.to_string());
    }

    match tokio::time::timeout(wait, resolver.current_track()).await {
        Err(_) => {
            warn!("Now-playing source did not answer within {:?}", wait);
            Err(ResolutionError::Timeout)
        }
        Ok(Err(e)) => {
            warn!("Now-playing source failed: {}", e);
            Err(ResolutionError::NoActiveTrack)
        }
        Ok(Ok(None)) => {
            debug!("Nothing is playing");
            Err(ResolutionError::NoActiveTrack)
        }
        Ok(Ok(Some(track))) => {
            debug!("Resolved current track {:?}", track);
            track.query().ok_or(ResolutionError::NoActiveTrack)
        }
    }
}
