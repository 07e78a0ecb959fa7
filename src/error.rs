use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Discord API error: {0}")]
    #[diagnostic(code(planning_bot::discord_api))]
    DiscordApi(#[from] serenity::Error),

    #[error("Environment error: {0}")]
    #[diagnostic(code(planning_bot::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(planning_bot::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    #[diagnostic(code(planning_bot::io))]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    #[diagnostic(code(planning_bot::other))]
    Other(String),
}

/// Failures of a single calendar feed lookup.
///
/// These never abort the bot: the lookup turns them into an error embed.
#[derive(Debug, Error, Diagnostic)]
pub enum FeedError {
    /// The feed answered with a non-success status
    #[error("HTTP error: {0}")]
    #[diagnostic(code(planning_bot::feed::status))]
    Status(reqwest::StatusCode),

    /// The request never produced a response
    #[error("Request failed: {0}")]
    #[diagnostic(code(planning_bot::feed::request))]
    Request(#[from] reqwest::Error),

    /// The body is not a usable iCalendar document
    #[error("Invalid calendar data: {0}")]
    #[diagnostic(code(planning_bot::feed::parse))]
    Parse(String),

    /// The feed actor is gone
    #[error("Calendar feed unavailable: {0}")]
    #[diagnostic(code(planning_bot::feed::unavailable))]
    Unavailable(String),
}

impl FeedError {
    /// Whether the failure happened while fetching rather than parsing
    pub fn is_fetch(&self) -> bool {
        !matches!(self, FeedError::Parse(_))
    }
}

/// Type alias for Result with our Error type
pub type BotResult<T> = Result<T, Error>;

/// Type alias for the outcome of a feed lookup
pub type FeedResult<T> = Result<T, FeedError>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create feed parse errors
pub fn parse_error(message: &str) -> FeedError {
    FeedError::Parse(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
