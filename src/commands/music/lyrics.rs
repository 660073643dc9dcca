//! Defines the `/lyrics` command and the pipeline behind it.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, error, info, warn};

use crate::config::NowPlayingSource;
use crate::utils::lyrics_ovh::{FetchError, LyricsOvh, LyricsProvider, SongQuery};
use crate::utils::now_playing::{PresenceResolver, SpotifyPlayerResolver, TrackResolver};
use crate::{CommandResult, Context};

use super::utils::lyrics_messages::{LyricsResponse, OutputMode, format_lyrics};
use super::utils::query_resolver::{ResolutionError, resolve_query};

const NO_ACTIVITY_MESSAGE: &str = "Failed to get current Spotify activity.";

/// Grab a song's lyrics
#[poise::command(slash_command, category = "Music")]
pub async fn lyrics(
    ctx: Context<'_>,
    #[description = "The song name to search lyrics for (artist title)"] name: Option<String>,
    #[description = "Whether to send the lyrics to chat"] send: Option<bool>,
) -> CommandResult {
    let author = ctx.author();
    let mode = OutputMode::from_send_flag(send.unwrap_or(false));
    debug!(
        "Lyrics request from user {}: name={:?}, mode={:?}",
        author.name, name, mode
    );

    // Failures stay private even in text mode; public lyrics are a later followup.
    ctx.defer_ephemeral().await?;

    let data = ctx.data();
    let resolver: Box<dyn TrackResolver> = match &data.config.now_playing {
        NowPlayingSource::Presence => Box::new(PresenceResolver::new(
            ctx.serenity_context().cache.clone(),
            ctx.guild_id(),
            author.id,
        )),
        NowPlayingSource::Spotify(credentials) => Box::new(SpotifyPlayerResolver::new(
            data.http.clone(),
            credentials.clone(),
        )),
    };
    let provider = LyricsOvh::new(
        data.http.clone(),
        data.config.lyrics_api_url.clone(),
        data.config.lyrics_site_url.clone(),
    );

    let response = lyrics_response(
        name.as_deref(),
        mode,
        resolver.as_ref(),
        &provider,
        data.config.now_playing_timeout,
    )
    .await;

    info!(
        "Sending {} lyrics reply to {}",
        response.title.as_deref().unwrap_or("plain"),
        author.name
    );
    for followup in response.into_followups() {
        ctx.send(followup.into_reply()).await?;
    }

    Ok(())
}

/// Runs one invocation: resolve the song name, fetch, format.
///
/// Never fails; every error becomes a plain-text reply for the user.
pub async fn lyrics_response(
    name: Option<&str>,
    mode: OutputMode,
    resolver: &dyn TrackResolver,
    provider: &dyn LyricsProvider,
    wait: Duration,
) -> LyricsResponse {
    let song_name = match resolve_query(name, resolver, wait).await {
        Ok(song_name) => song_name,
        Err(e) => {
            warn!("Could not resolve a song name: {}", e);
            return LyricsResponse::failure(resolution_message(&e));
        }
    };

    let query = match SongQuery::parse(&song_name) {
        Ok(query) => query,
        Err(e) => {
            warn!("Rejected song name '{}': {}", song_name, e);
            return LyricsResponse::failure(fetch_message(&e, None));
        }
    };

    match provider.fetch(&query).await {
        Ok(record) => {
            info!("Fetched lyrics for '{}' by '{}'", record.title, record.artist);
            format_lyrics(record, mode)
        }
        Err(e) => {
            error!("Failed to fetch lyrics for '{}': {}", song_name, e);
            LyricsResponse::failure(fetch_message(&e, Some(&query)))
        }
    }
}

fn resolution_message(error: &ResolutionError) -> String {
    match error {
        ResolutionError::NoActiveTrack | ResolutionError::Timeout => {
            NO_ACTIVITY_MESSAGE.to_string()
        }
    }
}

fn fetch_message(error: &FetchError, query: Option<&SongQuery>) -> String {
    match error {
        FetchError::InvalidQuery => {
            "Song name must contain at least artist and song title.".to_string()
        }
        FetchError::NotFound | FetchError::HttpError(StatusCode::NOT_FOUND) => match query {
            Some(query) => format!("No lyrics found for {} - {}.", query.artist(), query.title()),
            None => "No lyrics found.".to_string(),
        },
        FetchError::HttpError(_) | FetchError::Network(_) => error.to_string(),
        FetchError::ParseError(_) | FetchError::Endpoint(_) => {
            "Failed to read lyrics from the provider.".to_string()
        }
    }
}
