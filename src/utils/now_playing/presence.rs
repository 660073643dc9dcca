use std::sync::Arc;

use serenity::all::{ActivityType, Cache, GuildId, UserId};
use serenity::async_trait;
use tracing::debug;

use super::{NowPlayingError, TrackInfo, TrackResolver};

/// Activity name Discord uses for its Spotify integration.
const SPOTIFY_ACTIVITY: &str = "Spotify";

/// Reads the "Listening to Spotify" activity from a member's cached presence.
///
/// Needs the `GUILD_PRESENCES` gateway intent; without it the cache holds no
/// presences and every read yields `None`.
pub struct PresenceResolver {
    cache: Arc<Cache>,
    guild_id: Option<GuildId>,
    user_id: UserId,
}

impl PresenceResolver {
    pub fn new(cache: Arc<Cache>, guild_id: Option<GuildId>, user_id: UserId) -> Self {
        Self {
            cache,
            guild_id,
            user_id,
        }
    }

    fn spotify_activity(&self) -> Option<TrackInfo> {
        // Presences only exist for guild members.
        let guild_id = self.guild_id?;
        let guild = self.cache.guild(guild_id)?;
        let presence = guild.presences.get(&self.user_id)?;

        presence
            .activities
            .iter()
            .filter(|activity| activity.kind == ActivityType::Listening)
            .find_map(|activity| {
                track_from_listening(
                    &activity.name,
                    activity.details.as_deref(),
                    activity.state.as_deref(),
                )
            })
    }
}

#[async_trait]
impl TrackResolver for PresenceResolver {
    async fn current_track(&self) -> Result<Option<TrackInfo>, NowPlayingError> {
        let track = self.spotify_activity();
        debug!("Presence of user {} resolved to {:?}", self.user_id, track);
        Ok(track)
    }
}

/// Builds a track from a listening activity. Discord puts the track name in
/// `details` and the artists, separated by `"; "`, in `state`.
fn track_from_listening(
    name: &str,
    details: Option<&str>,
    state: Option<&str>,
) -> Option<TrackInfo> {
    if name != SPOTIFY_ACTIVITY {
        return None;
    }

    let track_name = details?.trim();
    if track_name.is_empty() {
        return None;
    }

    let artists = state
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|artist| !artist.is_empty())
        .map(str::to_string)
        .collect();

    Some(TrackInfo {
        name: track_name.to_string(),
        artists,
    })
}
