//! iCalendar (RFC 5545) export for event posts.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use super::sanitize::plain_text;
use crate::models::post;

const UTC_STAMP: &str = "%Y%m%dT%H%M%SZ";
const MAX_LINE_OCTETS: usize = 75;
const PRODUCT_ID: &str = "-//mall-site//Events//EN";

/// One `VEVENT` worth of data.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl CalendarEvent {
    /// Builds the event for a post.
    ///
    /// Posts without event metadata start at their publication time. A missing
    /// or inverted end defaults to one hour after the start.
    pub fn from_post(post: &post::Model, host: &str, page_url: Option<String>) -> Self {
        let starts_at = post
            .event_starts_at
            .map(|at| at.with_timezone(&Utc))
            .unwrap_or_else(|| post.published_at_utc());
        let ends_at = post
            .event_ends_at
            .map(|at| at.with_timezone(&Utc))
            .filter(|end| *end > starts_at)
            .unwrap_or(starts_at + Duration::hours(1));

        let description = post
            .summary
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| plain_text(&post.body));

        Self {
            uid: format!("{}@{}", post.slug, host),
            summary: post.title.clone(),
            description: Some(description).filter(|d| !d.is_empty()),
            location: post.event_location.clone(),
            url: page_url,
            starts_at,
            ends_at,
        }
    }

    /// Serializes a single-event `VCALENDAR`; `stamp` becomes `DTSTAMP`.
    pub fn to_ics(&self, stamp: DateTime<Utc>) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{PRODUCT_ID}"),
            "CALSCALE:GREGORIAN".to_string(),
            "METHOD:PUBLISH".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", escape_text(&self.uid)),
            format!("DTSTAMP:{}", format_utc(stamp)),
            format!("DTSTART:{}", format_utc(self.starts_at)),
            format!("DTEND:{}", format_utc(self.ends_at)),
            format!("SUMMARY:{}", escape_text(&self.summary)),
        ];
        if let Some(description) = &self.description {
            lines.push(format!("DESCRIPTION:{}", escape_text(description)));
        }
        if let Some(location) = &self.location {
            lines.push(format!("LOCATION:{}", escape_text(location)));
        }
        if let Some(url) = &self.url {
            lines.push(format!("URL:{url}"));
        }
        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        let mut out = String::new();
        for line in lines {
            out.push_str(&fold_line(&line));
            out.push_str("\r\n");
        }
        out
    }
}

/// `YYYYMMDDTHHMMSSZ`
pub fn format_utc(at: DateTime<Utc>) -> String {
    at.format(UTC_STAMP).to_string()
}

pub fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, UTC_STAMP)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Reads a property value back out of serialized calendar text, unfolding
/// continuation lines first. Parameters (`NAME;...:`) are not supported.
pub fn property(ics: &str, name: &str) -> Option<String> {
    let unfolded = ics.replace("\r\n ", "");
    unfolded
        .split("\r\n")
        .find_map(|line| line.strip_prefix(name)?.strip_prefix(':'))
        .map(str::to_string)
}

fn escape_text(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Splits a content line into 75-octet chunks, never inside a UTF-8 sequence.
/// Continuation lines start with a single space, which counts towards the limit.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut used = 0;
    for ch in line.chars() {
        let width = ch.len_utf8();
        if used + width > MAX_LINE_OCTETS {
            folded.push_str("\r\n ");
            used = 1;
        }
        folded.push(ch);
        used += width;
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds;
    use chrono::TimeZone;

    fn event_post() -> post::Model {
        seeds::posts()
            .into_iter()
            .find(|p| p.slug == "summer-fashion-week-2025")
            .unwrap()
    }

    #[test]
    fn dtstart_round_trips() {
        let post = event_post();
        let event = CalendarEvent::from_post(&post, "mall.example", None);
        let ics = event.to_ics(Utc::now());

        let start = property(&ics, "DTSTART").and_then(|v| parse_utc(&v)).unwrap();
        assert_eq!(start, post.event_starts_at.unwrap().with_timezone(&Utc));
        assert_eq!(
            property(&ics, "DTSTART").unwrap(),
            "20250614T100000Z"
        );
    }

    #[test]
    fn uses_crlf_and_folds_long_lines() {
        let mut post = event_post();
        post.summary = Some("A very long description ".repeat(10));
        let ics = CalendarEvent::from_post(&post, "mall.example", None).to_ics(Utc::now());

        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert!(!ics.replace("\r\n", "").contains('\n'));
        for line in ics.split("\r\n") {
            assert!(line.len() <= MAX_LINE_OCTETS, "line too long: {line}");
        }
        assert_eq!(
            property(&ics, "DESCRIPTION").unwrap(),
            "A very long description ".repeat(10)
        );
    }

    #[test]
    fn folding_respects_multibyte_characters() {
        let line = format!("SUMMARY:{}", "é".repeat(60));
        let folded = fold_line(&line);
        for chunk in folded.split("\r\n") {
            assert!(chunk.len() <= MAX_LINE_OCTETS);
        }
        assert_eq!(folded.replace("\r\n ", ""), line);
    }

    #[test]
    fn escapes_text_values() {
        assert_eq!(
            escape_text("Centre Court; Ground, Floor\\1\nNext"),
            "Centre Court\\; Ground\\, Floor\\\\1\\nNext"
        );
    }

    #[test]
    fn non_event_post_defaults_to_one_hour_from_publication() {
        let post = seeds::posts()
            .into_iter()
            .find(|p| p.event_starts_at.is_none())
            .unwrap();
        let event = CalendarEvent::from_post(&post, "mall.example", None);

        assert_eq!(event.starts_at, post.published_at_utc());
        assert_eq!(event.ends_at, event.starts_at + Duration::hours(1));
        assert_eq!(event.uid, format!("{}@mall.example", post.slug));
    }

    #[test]
    fn stamp_is_taken_from_caller() {
        let stamp = Utc.with_ymd_and_hms(2026, 5, 1, 8, 30, 0).unwrap();
        let ics = CalendarEvent::from_post(&event_post(), "mall.example", None).to_ics(stamp);
        assert_eq!(property(&ics, "DTSTAMP").unwrap(), "20260501T083000Z");
    }
}
