//! Helpers behind the `/lyrics` command.

/// Formatting of lyrics into text or embed replies.
pub mod lyrics_messages;
/// Working out which song an invocation is about.
pub mod query_resolver;
