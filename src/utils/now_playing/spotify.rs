use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use serenity::async_trait;
use tracing::{debug, info, warn};

use crate::config::SpotifyCredentials;

use super::{NowPlayingError, TrackInfo, TrackResolver};

const ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const API_URL: &str = "https://api.spotify.com";

/// Access token answer from the accounts service.
#[derive(Debug, Deserialize)]
struct SpotifyToken {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct CurrentlyPlaying {
    #[serde(default)]
    is_playing: bool,
    #[serde(default)]
    currently_playing_type: Option<String>,
    #[serde(default)]
    item: Option<PlayingItem>,
}

#[derive(Debug, Deserialize)]
struct PlayingItem {
    name: String,
    #[serde(default)]
    artists: Vec<PlayingArtist>,
}

#[derive(Debug, Deserialize)]
struct PlayingArtist {
    name: String,
}

impl CurrentlyPlaying {
    fn into_track(self) -> Option<TrackInfo> {
        // Podcasts and ads carry no artist to look lyrics up by.
        if self.currently_playing_type.as_deref().unwrap_or("track") != "track" {
            return None;
        }

        let item = self.item?;
        Some(TrackInfo {
            name: item.name,
            artists: item.artists.into_iter().map(|artist| artist.name).collect(),
        })
    }
}

/// Reads what the account behind a refresh token is playing on Spotify.
///
/// A fresh access token is requested on every read; nothing is kept between
/// invocations.
pub struct SpotifyPlayerResolver {
    client: Client,
    credentials: SpotifyCredentials,
    accounts_url: String,
    api_url: String,
}

impl SpotifyPlayerResolver {
    pub fn new(client: Client, credentials: SpotifyCredentials) -> Self {
        Self::with_base_urls(client, credentials, ACCOUNTS_URL, API_URL)
    }

    pub fn with_base_urls(
        client: Client,
        credentials: SpotifyCredentials,
        accounts_url: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            credentials,
            accounts_url: accounts_url.into(),
            api_url: api_url.into(),
        }
    }

    async fn access_token(&self) -> Result<String, NowPlayingError> {
        let auth = BASE64_STANDARD.encode(format!(
            "{}:{}",
            self.credentials.client_id, self.credentials.client_secret
        ));

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", self.credentials.refresh_token.as_str()),
        ];
        let response = self
            .client
            .post(format!("{}/api/token", self.accounts_url))
            .header(header::AUTHORIZATION, format!("Basic {auth}"))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Spotify token request failed: {}", response.status());
            return Err(NowPlayingError::Status(response.status()));
        }

        let token: SpotifyToken = serde_json::from_str(&response.text().await?)?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl TrackResolver for SpotifyPlayerResolver {
    async fn current_track(&self) -> Result<Option<TrackInfo>, NowPlayingError> {
        let token = self.access_token().await?;

        info!("Reading Spotify player state");
        let response = self
            .client
            .get(format!("{}/v1/me/player/currently-playing", self.api_url))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => {
                debug!("Spotify player is idle");
                Ok(None)
            }
            status if status.is_success() => {
                let playing: CurrentlyPlaying = serde_json::from_str(&response.text().await?)?;
                debug!(
                    "Spotify player state: playing={}, type={:?}",
                    playing.is_playing, playing.currently_playing_type
                );
                Ok(playing.into_track())
            }
            status => Err(NowPlayingError::Status(status)),
        }
    }
}
