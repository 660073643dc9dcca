//! Common test utilities, fixtures, and mocks

#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

use std::sync::Once;
use std::time::Duration;

use lyricist::utils::lyrics_ovh::LyricsOvh;
use tracing::Level;
use url::Url;
use wiremock::MockServer;

/// How long the pipeline waits on a now-playing source in tests.
pub const WAIT: Duration = Duration::from_millis(250);

pub const SITE: &str = "https://lyrics.ovh";

static INIT: Once = Once::new();

/// Initialize tracing for tests
pub fn init() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .init();
    });
}

/// A lyrics.ovh client pointed at the mock server's `/v1/`.
pub fn provider(server: &MockServer) -> LyricsOvh {
    let api_url = Url::parse(&format!("{}/v1/", server.uri())).expect("mock server URL");
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build test HTTP client");
    LyricsOvh::new(client, api_url, SITE)
}
