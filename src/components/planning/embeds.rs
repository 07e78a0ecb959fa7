use super::models::{EmbedField, EmbedPayload, PlanningEvent};
use super::time::{format_date, format_time};
use crate::error::FeedResult;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use poise::serenity_prelude::{CreateEmbed, CreateEmbedFooter, Timestamp};
use rust_i18n::t;

/// Default embed color
pub const PLANNING_COLOR: u32 = 0x00_99_FF;
/// Color of the embed shown when the feed could not be loaded
pub const ERROR_COLOR: u32 = 0xFF_00_00;
/// Color of the date selection prompt
pub const SELECTION_COLOR: u32 = 0xF0_B2_32;

/// Separator after which the description is dropped.
///
/// This is the two-character escape `\n` as it appears in the raw feed text,
/// not a newline character.
pub const PROFESSOR_SEPARATOR: &str = "\\n";

/// First line of an event description
pub fn professor_line(description: &str) -> &str {
    description
        .split(PROFESSOR_SEPARATOR)
        .next()
        .unwrap_or(description)
}

/// Embed field describing one event
pub fn event_field(event: &PlanningEvent, tz: Tz) -> EmbedField {
    let title = event
        .title
        .clone()
        .unwrap_or_else(|| t!("planning_untitled").to_string());

    let mut value = t!(
        "planning_time",
        start = format_time(&event.start, tz),
        end = format_time(&event.end, tz)
    )
    .to_string();

    if let Some(location) = &event.location {
        value.push('\n');
        value.push_str(&t!("planning_location", location = location));
    }
    if let Some(description) = &event.description {
        value.push('\n');
        value.push_str(&t!("planning_professor", professor = professor_line(description)));
    }

    EmbedField {
        name: format!("**{}**", title),
        value,
        inline: false,
    }
}

/// Planning embed for `date` from the outcome of a feed lookup
pub fn planning_embed(
    date: NaiveDate,
    lookup: &FeedResult<Vec<PlanningEvent>>,
    tz: Tz,
    now: DateTime<Utc>,
) -> EmbedPayload {
    let mut embed = EmbedPayload {
        title: t!("planning_title", date = format_date(date)).to_string(),
        description: None,
        fields: Vec::new(),
        color: PLANNING_COLOR,
        footer: t!("planning_footer").to_string(),
        timestamp: now,
    };

    match lookup {
        Ok(events) if events.is_empty() => {
            embed.description = Some(t!("planning_no_events").to_string());
        }
        Ok(events) => {
            embed.fields = events.iter().map(|event| event_field(event, tz)).collect();
        }
        Err(e) => {
            embed.description = Some(t!("planning_error", error = e.to_string()).to_string());
            embed.color = ERROR_COLOR;
        }
    }

    embed
}

/// Prompt listing each candidate date next to its marker
pub fn selection_embed(
    options: &[(&str, NaiveDate)],
    timeout_secs: u64,
    now: DateTime<Utc>,
) -> EmbedPayload {
    let fields = options
        .iter()
        .map(|(marker, date)| EmbedField {
            name: format!("{} {}", marker, format_date(*date)),
            value: "\u{200B}".to_string(),
            inline: false,
        })
        .collect();

    EmbedPayload {
        title: t!("selection_title").to_string(),
        description: Some(t!("selection_description", seconds = timeout_secs.to_string()).to_string()),
        fields,
        color: SELECTION_COLOR,
        footer: t!("selection_footer").to_string(),
        timestamp: now,
    }
}

impl EmbedPayload {
    /// Convert to the serenity builder
    pub fn to_create_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new()
            .title(&self.title)
            .color(self.color)
            .footer(CreateEmbedFooter::new(&self.footer));

        if let Ok(timestamp) = Timestamp::from_unix_timestamp(self.timestamp.timestamp()) {
            embed = embed.timestamp(timestamp);
        }
        if let Some(description) = &self.description {
            embed = embed.description(description);
        }
        for field in &self.fields {
            embed = embed.field(&field.name, &field.value, field.inline);
        }

        embed
    }
}
