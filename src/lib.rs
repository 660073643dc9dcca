//! Lyricist: a Discord bot serving the `/lyrics` command.
//!
//! The binary in `main.rs` wires the poise framework; everything the command
//! needs lives in this library so it can be exercised from `tests/`.

pub mod commands;
pub mod config;
pub mod utils;

use config::Config;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// User data shared by every command invocation. Read-only after setup.
pub struct Data {
    pub config: Config,
    /// Shared HTTP client, built with the configured request timeout.
    pub http: reqwest::Client,
}

impl Data {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("lyricist/", env!("CARGO_PKG_VERSION")))
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self { config, http })
    }
}
