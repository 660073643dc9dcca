//! Now-playing sources standing in for Discord presence and Spotify

use async_trait::async_trait;
use lyricist::utils::now_playing::{NowPlayingError, TrackInfo, TrackResolver};
use mockall::mock;
use reqwest::StatusCode;

mock! {
    pub Resolver {}

    #[async_trait]
    impl TrackResolver for Resolver {
        async fn current_track(&self) -> Result<Option<TrackInfo>, NowPlayingError>;
    }
}

/// A resolver that must never be consulted.
pub fn unused_resolver() -> MockResolver {
    let mut resolver = MockResolver::new();
    resolver.expect_current_track().never();
    resolver
}

/// A resolver reporting `name` by `artist`.
pub fn playing(artist: &str, name: &str) -> MockResolver {
    let track = TrackInfo {
        name: name.to_string(),
        artists: vec![artist.to_string()],
    };
    let mut resolver = MockResolver::new();
    resolver
        .expect_current_track()
        .times(1)
        .returning(move || Ok(Some(track.clone())));
    resolver
}

/// A resolver whose source is down.
pub fn failing() -> MockResolver {
    let mut resolver = MockResolver::new();
    resolver
        .expect_current_track()
        .returning(|| Err(NowPlayingError::Status(StatusCode::SERVICE_UNAVAILABLE)));
    resolver
}

/// A source that never answers.
pub struct SilentResolver;

#[async_trait]
impl TrackResolver for SilentResolver {
    async fn current_track(&self) -> Result<Option<TrackInfo>, NowPlayingError> {
        futures::future::pending().await
    }
}
