//! Sample provider payloads used across the integration tests

use serde_json::{Value, json};

pub const QUEEN_LYRICS: &str = "Is this the real life?\nIs this just fantasy?\nCaught in a landslide,\nNo escape from reality";

/// A successful lyrics.ovh body.
pub fn lyrics_body(lyrics: &str) -> Value {
    json!({ "lyrics": lyrics })
}

/// What lyrics.ovh answers, with a 404, for unknown songs.
pub fn not_found_body() -> Value {
    json!({ "error": "No lyrics found" })
}

/// Lyrics long enough to need truncation in a single message.
pub fn long_lyrics() -> String {
    (1..=200)
        .map(|n| format!("Line number {n} of a very long song"))
        .collect::<Vec<_>>()
        .join("\n")
}
