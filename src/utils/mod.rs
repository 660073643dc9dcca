//! This module aggregates various utility submodules used throughout the application.

/// Utilities for fetching lyrics from lyrics.ovh.
pub mod lyrics_ovh;
/// Sources for the track a user is currently listening to.
pub mod now_playing;
