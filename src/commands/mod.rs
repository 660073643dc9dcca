//! This module aggregates all the command modules for the bot.

/// Commands related to music (lyrics lookup).
pub mod music;
