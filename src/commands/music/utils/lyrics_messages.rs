use poise::CreateReply;
use serenity::all::{CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter};

use crate::utils::lyrics_ovh::LyricsRecord;

/// The maximum character length allowed for a single Discord message.
pub const MAX_MESSAGE_LENGTH: usize = 2000;
/// Discord's limit on an embed description.
const MAX_EMBED_DESCRIPTION_LENGTH: usize = 4096;

const ELLIPSIS: &str = "...";
const EMBED_COLOR: u32 = 0x209CEE;
const EMBED_LABEL: &str = "Lyrics";
const FOOTER_PREFIX: &str = "Lyrics provided by lyrics.ovh";
const FOOTER_ICON: &str = "https://lyrics.ovh/favicon.ico";
const SENT_NOTICE: &str = "Lyrics sent to the channel.";

/// How the lyrics should be delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// Plain message content, posted to the channel.
    Text,
    /// Rich embed, shown only to the invoking user.
    Embed,
}

impl OutputMode {
    /// `send = true` means "post the raw text to chat".
    pub fn from_send_flag(send: bool) -> Self {
        if send { Self::Text } else { Self::Embed }
    }
}

/// Embed contents, kept as plain data so it can be inspected before it is
/// turned into a serenity builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LyricsEmbed {
    pub author: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub thumbnail: Option<String>,
    pub color: u32,
    pub footer: String,
    pub footer_icon: String,
}

impl LyricsEmbed {
    pub fn to_create_embed(&self) -> CreateEmbed {
        let description =
            truncate_with_link(&self.description, &self.url, MAX_EMBED_DESCRIPTION_LENGTH);

        let mut embed = CreateEmbed::new()
            .author(CreateEmbedAuthor::new(&self.author))
            .title(&self.title)
            .description(description)
            .url(&self.url)
            .color(self.color)
            .footer(CreateEmbedFooter::new(&self.footer).icon_url(&self.footer_icon));

        if let Some(thumbnail) = &self.thumbnail {
            embed = embed.thumbnail(thumbnail);
        }

        embed
    }
}

/// What the `/lyrics` command answers with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LyricsResponse {
    pub content: Option<String>,
    pub embeds: Vec<LyricsEmbed>,
    pub ephemeral: bool,
    /// Label for the reply.
    pub title: Option<String>,
}

impl LyricsResponse {
    /// A plain-text failure notice, only visible to the invoking user.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            content: Some(message.into()),
            embeds: Vec::new(),
            ephemeral: true,
            title: None,
        }
    }

    /// Splits the response into the messages to send, in order, after an
    /// ephemeral defer.
    ///
    /// Discord turns the first followup into the deferred reply and keeps its
    /// visibility, so a public response goes out second, behind a private
    /// notice.
    pub fn into_followups(self) -> Vec<LyricsResponse> {
        if self.ephemeral {
            return vec![self];
        }

        let notice = Self {
            content: Some(SENT_NOTICE.to_string()),
            embeds: Vec::new(),
            ephemeral: true,
            title: None,
        };
        vec![notice, self]
    }

    pub fn into_reply(self) -> CreateReply {
        let mut reply = CreateReply::default().ephemeral(self.ephemeral);

        if let Some(content) = self.content {
            reply = reply.content(content);
        }
        for embed in &self.embeds {
            reply = reply.embed(embed.to_create_embed());
        }

        reply
    }
}

/// Formats fetched lyrics for the requested output mode.
pub fn format_lyrics(record: LyricsRecord, mode: OutputMode) -> LyricsResponse {
    match mode {
        OutputMode::Text => lyrics_text(record),
        OutputMode::Embed => lyrics_embed(record),
    }
}

fn lyrics_text(record: LyricsRecord) -> LyricsResponse {
    LyricsResponse {
        content: Some(truncate_with_link(
            &record.lyrics,
            &record.source_url,
            MAX_MESSAGE_LENGTH,
        )),
        embeds: Vec::new(),
        ephemeral: false,
        title: None,
    }
}

fn lyrics_embed(record: LyricsRecord) -> LyricsResponse {
    // Splitting "" yields one empty token, so an unknown year leaves a trailing space.
    let year = record.album_year.split(',').next().unwrap_or_default();
    let footer = format!("{FOOTER_PREFIX} | © {} {year}", record.artist);

    let thumbnail = Some(record.album_art).filter(|art| !art.is_empty());

    let embed = LyricsEmbed {
        author: record.artist,
        title: record.title,
        description: record.lyrics,
        url: record.source_url,
        thumbnail,
        color: EMBED_COLOR,
        footer,
        footer_icon: FOOTER_ICON.to_string(),
    };

    LyricsResponse {
        content: None,
        embeds: vec![embed],
        ephemeral: true,
        title: Some(EMBED_LABEL.to_string()),
    }
}

/// Returns `text` unchanged when it fits in `max` characters. Otherwise cuts it
/// so that the kept text, an ellipsis and a `Full Lyrics` link add up to
/// exactly `max` characters. Cuts on `char` boundaries.
pub fn truncate_with_link(text: &str, url: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let suffix = format!("\n\nFull Lyrics: {url}");
    let keep = max.saturating_sub(suffix.chars().count() + ELLIPSIS.len());

    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated.push_str(&suffix);
    truncated
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const SITE: &str = "https://lyrics.ovh";

    fn record(lyrics: &str) -> LyricsRecord {
        LyricsRecord {
            lyrics: lyrics.to_string(),
            artist: "Queen".to_string(),
            title: "Bohemian Rhapsody".to_string(),
            source_url: SITE.to_string(),
            album_art: String::new(),
            album_year: String::new(),
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(1999)]
    #[case(2000)]
    fn test_text_fits_verbatim(#[case] len: usize) {
        let lyrics = "a".repeat(len);

        let response = format_lyrics(record(&lyrics), OutputMode::Text);

        assert_eq!(response.content, Some(lyrics));
        assert!(response.embeds.is_empty());
        assert!(!response.ephemeral);
    }

    #[rstest]
    #[case(2001)]
    #[case(2500)]
    #[case(10_000)]
    fn test_text_truncated_to_exact_limit(#[case] len: usize) {
        let lyrics = "la ".repeat(len / 3 + 1);

        let content = format_lyrics(record(&lyrics), OutputMode::Text)
            .content
            .unwrap();

        let suffix = format!("...\n\nFull Lyrics: {SITE}");
        assert_eq!(content.chars().count(), MAX_MESSAGE_LENGTH);
        assert!(content.ends_with(&suffix));
        assert!(lyrics.starts_with(content.trim_end_matches(&suffix)));
    }

    #[test]
    fn test_truncation_keeps_multibyte_chars_whole() {
        let lyrics = "é🎵".repeat(1500);

        let content = truncate_with_link(&lyrics, SITE, MAX_MESSAGE_LENGTH);

        assert_eq!(content.chars().count(), MAX_MESSAGE_LENGTH);
        let kept = MAX_MESSAGE_LENGTH - format!("...\n\nFull Lyrics: {SITE}").chars().count();
        assert_eq!(
            content.chars().take(kept).collect::<String>(),
            lyrics.chars().take(kept).collect::<String>()
        );
    }

    #[test]
    fn test_embed_fields() {
        let response = format_lyrics(record("Is this the real life..."), OutputMode::Embed);

        assert_eq!(response.content, None);
        assert_eq!(response.title.as_deref(), Some("Lyrics"));
        assert!(response.ephemeral);
        assert_eq!(
            response.embeds,
            vec![LyricsEmbed {
                author: "Queen".to_string(),
                title: "Bohemian Rhapsody".to_string(),
                description: "Is this the real life...".to_string(),
                url: SITE.to_string(),
                thumbnail: None,
                color: 0x209CEE,
                footer: "Lyrics provided by lyrics.ovh | © Queen ".to_string(),
                footer_icon: "https://lyrics.ovh/favicon.ico".to_string(),
            }]
        );
    }

    #[test]
    fn test_embed_keeps_full_lyrics() {
        let lyrics = "x".repeat(5000);

        let response = format_lyrics(record(&lyrics), OutputMode::Embed);

        assert_eq!(response.embeds[0].description, lyrics);
    }

    #[test]
    fn test_embed_footer_uses_first_year_token() {
        let mut record = record("lyrics");
        record.album_year = "1975,1991".to_string();
        record.album_art = "https://example.com/art.png".to_string();

        let response = format_lyrics(record, OutputMode::Embed);
        let embed = &response.embeds[0];

        assert!(embed.footer.starts_with("Lyrics provided by lyrics.ovh"));
        assert!(embed.footer.ends_with("© Queen 1975"));
        assert_eq!(
            embed.thumbnail.as_deref(),
            Some("https://example.com/art.png")
        );
    }

    #[test]
    fn test_failure_is_ephemeral_text() {
        let response = LyricsResponse::failure("nope");

        assert_eq!(response.content.as_deref(), Some("nope"));
        assert!(response.embeds.is_empty());
        assert!(response.ephemeral);
    }

    #[test]
    fn test_private_response_is_a_single_followup() {
        let failure = LyricsResponse::failure("nope");
        assert_eq!(failure.clone().into_followups(), vec![failure]);

        let embed = format_lyrics(record("lyrics"), OutputMode::Embed);
        assert_eq!(embed.clone().into_followups(), vec![embed]);
    }

    #[test]
    fn test_public_text_follows_a_private_notice() {
        let text = format_lyrics(record("lyrics"), OutputMode::Text);

        let followups = text.clone().into_followups();

        assert_eq!(followups.len(), 2);
        assert!(followups[0].ephemeral);
        assert_eq!(followups[0].content.as_deref(), Some("Lyrics sent to the channel."));
        assert_eq!(followups[1], text);
        assert!(!followups[1].ephemeral);
    }

    #[test]
    fn test_create_embed_clamps_description() {
        let lyrics = "x".repeat(5000);
        let response = format_lyrics(record(&lyrics), OutputMode::Embed);

        let embed = serde_json::to_value(response.embeds[0].to_create_embed()).unwrap();
        let description = embed["description"].as_str().unwrap();

        assert_eq!(description.chars().count(), 4096);
        assert!(description.ends_with(&format!("...\n\nFull Lyrics: {SITE}")));
        assert_eq!(embed["title"], "Bohemian Rhapsody");
        assert_eq!(embed["color"], 0x209CEE);
    }

    #[test]
    fn test_output_mode_from_send_flag() {
        assert_eq!(OutputMode::from_send_flag(true), OutputMode::Text);
        assert_eq!(OutputMode::from_send_flag(false), OutputMode::Embed);
    }
}
