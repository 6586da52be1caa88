//! Pairing state: the live one-to-one conversation.
//!
//! The lifecycle logic (countdown, teardown, delivery) lives on the hub,
//! which owns all cross-identity atomicity; this module holds the data and
//! the text sanitization.

use time::OffsetDateTime;
use uuid::Uuid;

/// One entry of a pairing's message log. Blocked messages and report
/// markers appear as redactions; observers never see more than the marker.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub sender: Uuid,
    pub body: LogBody,
    pub at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub enum LogBody {
    Text(String),
    Redacted(String),
}

impl LogBody {
    /// What an observer is shown for this entry.
    pub fn observed(&self) -> &str {
        match self {
            LogBody::Text(text) => text,
            LogBody::Redacted(marker) => marker,
        }
    }
}

/// A running leave countdown. The generation lets a late timer tick detect
/// it has been superseded by a cancellation or a newer countdown.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    pub leaver: Uuid,
    pub generation: u64,
}

#[derive(Debug)]
pub struct Pairing {
    pub id: Uuid,
    pub members: [Uuid; 2],
    pub created_at: OffsetDateTime,
    pub report_count: u32,
    pub log: Vec<LogEntry>,
    pub observers: Vec<Uuid>,
    pub countdown: Option<Countdown>,
    /// Bumped on every countdown start and cancellation.
    pub countdown_generation: u64,
}

impl Pairing {
    pub fn new(a: Uuid, b: Uuid, now: OffsetDateTime) -> Self {
        Self {
            id: Uuid::now_v7(),
            members: [a, b],
            created_at: now,
            report_count: 0,
            log: Vec::new(),
            observers: Vec::new(),
            countdown: None,
            countdown_generation: 0,
        }
    }

    pub fn partner_of(&self, id: Uuid) -> Option<Uuid> {
        match self.members {
            [a, b] if a == id => Some(b),
            [a, b] if b == id => Some(a),
            _ => None,
        }
    }

    pub fn log_text(&mut self, sender: Uuid, text: String, at: OffsetDateTime) {
        self.log.push(LogEntry { sender, body: LogBody::Text(text), at });
    }

    pub fn log_redaction(&mut self, sender: Uuid, marker: String, at: OffsetDateTime) {
        self.log.push(LogEntry { sender, body: LogBody::Redacted(marker), at });
    }
}

/// Trim and HTML-escape a raw message. `None` when nothing survives.
pub fn sanitize_message(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_escapes_reserved_characters() {
        assert_eq!(
            sanitize_message(r#"<script>alert("hi & bye")</script>"#).unwrap(),
            "&lt;script&gt;alert(&quot;hi &amp; bye&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn sanitize_keeps_clean_text_byte_identical() {
        assert_eq!(sanitize_message("hello").as_deref(), Some("hello"));
    }

    #[test]
    fn whitespace_only_message_is_rejected() {
        assert_eq!(sanitize_message("   \t\n"), None);
    }

    #[test]
    fn partner_lookup() {
        let now = OffsetDateTime::now_utc();
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let pairing = Pairing::new(a, b, now);
        assert_eq!(pairing.partner_of(a), Some(b));
        assert_eq!(pairing.partner_of(b), Some(a));
        assert_eq!(pairing.partner_of(Uuid::now_v7()), None);
    }
}
