use crate::error::{config_error, env_error, BotResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

/// Default activity text for the bot
pub const DEFAULT_ACTIVITY: &str = "Regarde l'emploi du temps";

/// Default time zone used for "today" and day windows
pub const DEFAULT_TIMEZONE: &str = "Europe/Paris";

/// Default locale for user-facing text
pub const DEFAULT_LOCALE: &str = "fr";

/// Main configuration structure for the bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Discord bot token
    pub discord_token: String,
    /// Calendar feed URL, already rewritten from `webcal://`
    pub ical_url: String,
    /// IANA time zone treated as local time
    pub timezone: String,
    /// Bot activity status text
    pub activity: String,
    /// Locale for bot messages
    pub bot_locale: String,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present)
    pub fn load() -> BotResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Required variables
        let discord_token = lookup("DISCORD_TOKEN").ok_or_else(|| env_error("DISCORD_TOKEN"))?;
        let raw_url = lookup("ICAL_URL").ok_or_else(|| env_error("ICAL_URL"))?;
        let ical_url = normalize_feed_url(&raw_url)?.to_string();

        let timezone = lookup("TIMEZONE").unwrap_or_else(|| String::from(DEFAULT_TIMEZONE));
        if timezone.parse::<Tz>().is_err() {
            return Err(config_error(&format!("Unknown TIMEZONE: {}", timezone)));
        }

        let activity = lookup("BOT_ACTIVITY").unwrap_or_else(|| String::from(DEFAULT_ACTIVITY));
        let bot_locale = lookup("BOT_LOCALE").unwrap_or_else(|| String::from(DEFAULT_LOCALE));

        Ok(Config {
            discord_token,
            ical_url,
            timezone,
            activity,
            bot_locale,
        })
    }

    /// The configured time zone
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(chrono_tz::Europe::Paris)
    }

    /// The feed URL as a parsed URL
    pub fn feed_url(&self) -> BotResult<Url> {
        normalize_feed_url(&self.ical_url)
    }
}

/// Rewrite a `webcal://` feed address to `https://` and validate it
pub fn normalize_feed_url(raw: &str) -> BotResult<Url> {
    let raw = raw.trim();
    let rewritten = match raw.strip_prefix("webcal://") {
        Some(rest) => format!("https://{}", rest),
        None => raw.to_string(),
    };

    Url::parse(&rewritten).map_err(|e| config_error(&format!("Invalid ICAL_URL '{}': {}", raw, e)))
}
