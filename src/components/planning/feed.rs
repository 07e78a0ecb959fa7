use super::models::PlanningEvent;
use super::time::{localize, DayWindow};
use crate::error::{parse_error, FeedError, FeedResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use ical::parser::ical::component::IcalEvent;
use ical::property::Property;
use reqwest::Client;
use std::io::BufReader;
use tracing::{debug, info};
use url::Url;

/// Fetch the feed and keep the events starting on `date`
pub async fn fetch_events_on(
    client: &Client,
    url: &Url,
    tz: Tz,
    date: NaiveDate,
) -> FeedResult<Vec<PlanningEvent>> {
    let response = client.get(url.clone()).send().await?;

    if !response.status().is_success() {
        return Err(FeedError::Status(response.status()));
    }

    let body = response.text().await?;
    let events = parse_feed(&body, tz)?;
    let total = events.len();

    let selected = DayWindow::for_date(date, tz).filter(events);
    info!(
        "Feed returned {} events, {} on {}",
        total,
        selected.len(),
        date
    );

    Ok(selected)
}

/// Parse an iCalendar document into events, in feed order
pub fn parse_feed(body: &str, tz: Tz) -> FeedResult<Vec<PlanningEvent>> {
    let reader = ical::IcalParser::new(BufReader::new(body.as_bytes()));

    let mut calendars = 0;
    let mut events = Vec::new();

    for calendar_result in reader {
        let calendar = calendar_result.map_err(|e| parse_error(&format!("ICS parse error: {e}")))?;
        calendars += 1;

        for event in &calendar.events {
            if let Some(parsed) = parse_event(event, tz)? {
                events.push(parsed);
            }
        }
    }

    if calendars == 0 {
        return Err(parse_error("no VCALENDAR component found"));
    }

    Ok(events)
}

/// Parse a VEVENT component; events without DTSTART are skipped
fn parse_event(event: &IcalEvent, tz: Tz) -> FeedResult<Option<PlanningEvent>> {
    let mut title = None;
    let mut start = None;
    let mut end = None;
    let mut location = None;
    let mut description = None;

    for property in &event.properties {
        match property.name.as_str() {
            "SUMMARY" => title = text_value(&property.value),
            "DTSTART" => start = Some(parse_date_time(property, tz)?),
            "DTEND" => end = Some(parse_date_time(property, tz)?),
            "LOCATION" => location = text_value(&property.value),
            "DESCRIPTION" => description = text_value(&property.value),
            _ => {}
        }
    }

    let Some(start) = start else {
        debug!("Skipping event without DTSTART: {:?}", title);
        return Ok(None);
    };

    Ok(Some(PlanningEvent {
        title,
        start,
        end: end.unwrap_or(start),
        location,
        description,
    }))
}

/// Trimmed, unescaped TEXT value; blank values count as absent
fn text_value(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(unescape_text)
}

/// Undo the `\\`, `\,` and `\;` TEXT escapes.
///
/// `\n` stays as the two-character sequence, the description is cut there.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped @ ('\\' | ',' | ';')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// Decode a DTSTART/DTEND property into an instant
fn parse_date_time(property: &Property, tz: Tz) -> FeedResult<DateTime<Utc>> {
    let value = property
        .value
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| parse_error(&format!("{} has no value", property.name)))?;

    // All-day values are plain dates
    if value.len() == 8 {
        let date = NaiveDate::parse_from_str(value, "%Y%m%d")
            .map_err(|e| parse_error(&format!("Invalid {} date '{}': {}", property.name, value, e)))?;
        return Ok(localize(&date.and_time(NaiveTime::MIN), tz));
    }

    if let Some(utc) = value.strip_suffix('Z') {
        let naive = parse_naive(utc, &property.name)?;
        return Ok(Utc.from_utc_datetime(&naive));
    }

    let naive = parse_naive(value, &property.name)?;
    let zone = tzid(property)
        .and_then(|id| id.parse::<Tz>().ok())
        .unwrap_or(tz);

    Ok(localize(&naive, zone))
}

fn parse_naive(value: &str, name: &str) -> FeedResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .map_err(|e| parse_error(&format!("Invalid {} value '{}': {}", name, value, e)))
}

/// The TZID parameter of a property, if any
fn tzid(property: &Property) -> Option<&str> {
    property
        .params
        .as_ref()?
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("TZID"))
        .and_then(|(_, values)| values.first())
        .map(|id| id.trim_matches('"'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Paris;

    const FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Planning//FR\r\n\
BEGIN:VEVENT\r\n\
UID:1\r\n\
DTSTART:20240115T073000Z\r\n\
DTEND:20240115T093000Z\r\n\
SUMMARY:Algorithmique\r\n\
LOCATION:Salle 101\r\n\
DESCRIPTION:Dr. Martin\\nGroupe A\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:2\r\n\
DTSTART;TZID=Europe/Paris:20240115T140000\r\n\
DTEND;TZID=Europe/Paris:20240115T160000\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:3\r\n\
DTSTART;VALUE=DATE:20240116\r\n\
SUMMARY:Journée libre\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:4\r\n\
SUMMARY:No start\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn test_parse_feed_keeps_order_and_fields() {
        let events = parse_feed(FEED, Paris).unwrap();
        assert_eq!(events.len(), 3);

        let first = &events[0];
        assert_eq!(first.title.as_deref(), Some("Algorithmique"));
        assert_eq!(first.start, Utc.with_ymd_and_hms(2024, 1, 15, 7, 30, 0).unwrap());
        assert_eq!(first.end, Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap());
        assert_eq!(first.location.as_deref(), Some("Salle 101"));
        assert_eq!(first.description.as_deref(), Some("Dr. Martin\\nGroupe A"));

        let second = &events[1];
        assert_eq!(second.title, None);
        assert_eq!(second.start, Utc.with_ymd_and_hms(2024, 1, 15, 13, 0, 0).unwrap());

        // All-day event starts at local midnight and ends where it starts
        let third = &events[2];
        assert_eq!(third.start, Utc.with_ymd_and_hms(2024, 1, 15, 23, 0, 0).unwrap());
        assert_eq!(third.end, third.start);
    }

    #[test]
    fn test_floating_time_uses_bot_timezone() {
        let feed = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
DTSTART:20240701T080000\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        let events = parse_feed(feed, Paris).unwrap();
        assert_eq!(events[0].start, Utc.with_ymd_and_hms(2024, 7, 1, 6, 0, 0).unwrap());
    }

    #[test]
    fn test_malformed_start_is_parse_error() {
        let feed = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
DTSTART:tomorrow\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        assert!(matches!(parse_feed(feed, Paris), Err(FeedError::Parse(_))));
    }

    #[test]
    fn test_text_escapes_are_undone() {
        let feed = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
DTSTART:20240115T073000Z\r\n\
SUMMARY:TD Maths\\, groupe 2\r\n\
LOCATION:Salle 204\\, Bat. A\r\n\
DESCRIPTION:Dr. Martin\\; Mme Durand\\nC:\\\\partage\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        let events = parse_feed(feed, Paris).unwrap();

        assert_eq!(events[0].title.as_deref(), Some("TD Maths, groupe 2"));
        assert_eq!(events[0].location.as_deref(), Some("Salle 204, Bat. A"));
        assert_eq!(
            events[0].description.as_deref(),
            Some("Dr. Martin; Mme Durand\\nC:\\partage")
        );
    }

    #[test]
    fn test_unescape_keeps_unknown_escapes() {
        assert_eq!(unescape_text("a\\nb"), "a\\nb");
        assert_eq!(unescape_text("a\\Nb"), "a\\Nb");
        assert_eq!(unescape_text("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_empty_body_is_parse_error() {
        assert!(matches!(parse_feed("", Paris), Err(FeedError::Parse(_))));
    }
}
