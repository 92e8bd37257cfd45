// ABOUTME: iCalendar (RFC 5545) writer for cleaning appointment invites
// ABOUTME: Emits a single VEVENT with escaping, CRLF line endings and 75-octet folding
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use chrono::{DateTime, Utc};

use crate::constants::service_names;

/// Longest content line before folding, in octets
const MAX_LINE_OCTETS: usize = 75;

/// A participant with an optional mailbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Display name
    pub name: String,
    /// E-mail address
    pub email: Option<String>,
}

/// One calendar event
#[derive(Debug, Clone)]
pub struct CalendarEvent {
    /// Globally unique event ID
    pub uid: String,
    /// Creation stamp
    pub stamp: DateTime<Utc>,
    /// Start time
    pub start: DateTime<Utc>,
    /// End time
    pub end: DateTime<Utc>,
    /// Title
    pub summary: String,
    /// Street address
    pub location: String,
    /// Free text; may contain newlines
    pub description: String,
    /// The business
    pub organizer: Option<Participant>,
    /// The client
    pub attendee: Option<Participant>,
    /// Recurrence rule value, e.g. `FREQ=WEEKLY`
    pub rrule: Option<String>,
}

fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape a TEXT value
#[must_use]
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Quote a parameter value; DQUOTE is not allowed inside
fn param_value(value: &str) -> String {
    let cleaned: String = value.chars().filter(|c| *c != '"' && !c.is_control()).collect();
    if cleaned.contains([':', ';', ',']) {
        format!("\"{cleaned}\"")
    } else {
        cleaned
    }
}

/// Fold a content line into 75-octet chunks without splitting characters
#[must_use]
pub fn fold_line(line: &str) -> String {
    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut used = 0;
    // Continuation lines start with a space that counts toward the limit
    let mut limit = MAX_LINE_OCTETS;
    for c in line.chars() {
        let width = c.len_utf8();
        if used + width > limit {
            folded.push_str("\r\n ");
            used = 0;
            limit = MAX_LINE_OCTETS - 1;
        }
        folded.push(c);
        used += width;
    }
    folded
}

fn participant_line(property: &str, extra: &str, participant: &Participant) -> Option<String> {
    let email = participant.email.as_deref()?;
    Some(format!(
        "{property};CN={}{extra}:mailto:{email}",
        param_value(&participant.name)
    ))
}

impl CalendarEvent {
    /// Render a complete VCALENDAR object
    #[must_use]
    pub fn to_ics(&self) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_owned(),
            "VERSION:2.0".to_owned(),
            format!(
                "PRODID:-//Async-IO//{}//EN",
                service_names::CLEANERS_ASSISTANT
            ),
            "CALSCALE:GREGORIAN".to_owned(),
            "METHOD:PUBLISH".to_owned(),
            "BEGIN:VEVENT".to_owned(),
            format!("UID:{}", self.uid),
            format!("DTSTAMP:{}", format_timestamp(&self.stamp)),
            format!("DTSTART:{}", format_timestamp(&self.start)),
            format!("DTEND:{}", format_timestamp(&self.end)),
            format!("SUMMARY:{}", escape_text(&self.summary)),
            format!("LOCATION:{}", escape_text(&self.location)),
            format!("DESCRIPTION:{}", escape_text(&self.description)),
        ];
        if let Some(line) = self
            .organizer
            .as_ref()
            .and_then(|p| participant_line("ORGANIZER", "", p))
        {
            lines.push(line);
        }
        if let Some(line) = self
            .attendee
            .as_ref()
            .and_then(|p| participant_line("ATTENDEE", ";ROLE=REQ-PARTICIPANT", p))
        {
            lines.push(line);
        }
        if let Some(rule) = &self.rrule {
            lines.push(format!("RRULE:{rule}"));
        }
        lines.push("END:VEVENT".to_owned());
        lines.push("END:VCALENDAR".to_owned());

        let mut out = String::new();
        for line in &lines {
            out.push_str(&fold_line(line));
            out.push_str("\r\n");
        }
        out
    }
}
