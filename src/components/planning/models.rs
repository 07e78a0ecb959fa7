use chrono::{DateTime, Utc};

/// One VEVENT from the calendar feed, as the bot renders it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningEvent {
    pub title: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// A single embed field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Display payload produced by the composer, independent of the Discord builders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedPayload {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<EmbedField>,
    pub color: u32,
    pub footer: String,
    pub timestamp: DateTime<Utc>,
}
