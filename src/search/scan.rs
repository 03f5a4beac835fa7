//! Per-file transcript scan: metadata, matching, context and excerpts.

use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::error::Result;
use crate::schema::transcript::{EventKind, TranscriptEvent};

/// Visible stand-in for a newline in single-line renderings.
pub const NEWLINE_MARKER: &str = "↵";

/// Case-insensitive literal substring query.
#[derive(Debug, Clone)]
pub struct Query {
    text: String,
    pattern: Regex,
}

impl Query {
    pub fn new(text: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            text: text.to_string(),
            pattern,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Byte range of the first match.
    pub fn find(&self, haystack: &str) -> Option<(usize, usize)> {
        self.pattern.find(haystack).map(|m| (m.start(), m.end()))
    }

    /// Byte ranges of all non-overlapping matches.
    pub fn find_all<'a>(&'a self, haystack: &'a str) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.pattern.find_iter(haystack).map(|m| (m.start(), m.end()))
    }
}

/// Which side of the conversation may produce matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    Both,
    HumanOnly,
    AgentOnly,
}

impl RoleFilter {
    /// `--user` / `--assistant`: both or neither means no filtering.
    pub fn from_flags(user: bool, assistant: bool) -> Self {
        match (user, assistant) {
            (true, false) => RoleFilter::HumanOnly,
            (false, true) => RoleFilter::AgentOnly,
            _ => RoleFilter::Both,
        }
    }

    pub fn accepts(self, kind: &EventKind) -> bool {
        match self {
            RoleFilter::Both => true,
            RoleFilter::HumanOnly => *kind == EventKind::User,
            RoleFilter::AgentOnly => matches!(kind, EventKind::Assistant | EventKind::Agent),
        }
    }
}

/// Window sizes used while scanning.
#[derive(Debug, Clone, Copy)]
pub struct ScanSettings {
    pub context_lines: usize,
    pub excerpt_lead: usize,
    pub excerpt_trail: usize,
    pub context_chars: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            context_lines: 2,
            excerpt_lead: 100,
            excerpt_trail: 200,
            context_chars: 200,
        }
    }
}

/// Facts derived from a whole transcript.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub cwd: Option<String>,
    pub summary: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub message_count: usize,
}

impl SessionMetadata {
    /// First cwd, last summary, first/last conversational timestamps, and
    /// the number of human-typed messages.
    pub fn derive(events: &[(usize, TranscriptEvent)]) -> Self {
        let mut meta = SessionMetadata::default();
        for (_, ev) in events {
            if meta.cwd.is_none() {
                meta.cwd.clone_from(&ev.cwd);
            }
            if ev.kind == EventKind::Summary && ev.summary.is_some() {
                meta.summary.clone_from(&ev.summary);
            }
            if ev.kind.is_conversational() && ev.timestamp.is_some() {
                if meta.created.is_none() {
                    meta.created.clone_from(&ev.timestamp);
                }
                meta.modified.clone_from(&ev.timestamp);
            }
            if ev.is_human_message() {
                meta.message_count += 1;
            }
        }
        meta
    }
}

/// A neighbouring line shown around a match.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContextLine {
    pub line_number: usize,
    pub event_type: EventKind,
    pub text: String,
}

/// One matching event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub session_id: String,
    pub metadata: SessionMetadata,
    pub line_number: usize,
    pub event_type: EventKind,
    pub excerpt: String,
    pub context_before: Vec<ContextLine>,
    pub context_after: Vec<ContextLine>,
}

/// Cut `text` to at most `max` chars, marking the cut with `...`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    let flat = text.replace('\n', NEWLINE_MARKER);
    if flat.chars().count() <= max {
        return flat;
    }
    let mut cut: String = flat.chars().take(max).collect();
    cut.push_str("...");
    cut
}

/// Window `text` around the match at byte range `start..end`.
///
/// Keeps `lead` chars before the match and `trail` chars plus the match
/// itself after its start, adds `...` where text was dropped, and flattens
/// newlines to [`NEWLINE_MARKER`].
pub fn excerpt(text: &str, (start, end): (usize, usize), lead: usize, trail: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let match_at = text[..start].chars().count();
    let match_len = text[start..end].chars().count();

    let from = match_at.saturating_sub(lead);
    let to = (match_at + match_len + trail).min(chars.len());

    let mut out = String::new();
    if from > 0 {
        out.push_str("...");
    }
    out.extend(&chars[from..to]);
    if to < chars.len() {
        out.push_str("...");
    }
    out.replace('\n', NEWLINE_MARKER)
}

/// Parse the non-blank lines of a transcript, keeping 1-based line numbers.
pub fn parse_lines(content: &str) -> Vec<(usize, TranscriptEvent)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, TranscriptEvent::parse(line)))
        .collect()
}

/// Search an already-read transcript.
pub fn scan_content(
    session_id: &str,
    content: &str,
    query: &Query,
    filter: RoleFilter,
    settings: &ScanSettings,
) -> Vec<SearchMatch> {
    let events = parse_lines(content);
    let metadata = SessionMetadata::derive(&events);
    let texts: Vec<Option<String>> = events.iter().map(|(_, ev)| ev.text()).collect();

    let context_at = |i: usize| -> Option<ContextLine> {
        let text = texts[i].as_ref()?;
        let (line_number, ev) = &events[i];
        Some(ContextLine {
            line_number: *line_number,
            event_type: ev.kind.clone(),
            text: truncate_chars(text, settings.context_chars),
        })
    };

    let mut matches = Vec::new();
    for (i, (line_number, ev)) in events.iter().enumerate() {
        if !filter.accepts(&ev.kind) {
            continue;
        }
        let Some(text) = &texts[i] else {
            continue;
        };
        let Some(range) = query.find(text) else {
            continue;
        };

        let mut context_before: Vec<ContextLine> = (0..i)
            .rev()
            .filter_map(context_at)
            .take(settings.context_lines)
            .collect();
        context_before.reverse();
        let context_after: Vec<ContextLine> = (i + 1..events.len())
            .filter_map(context_at)
            .take(settings.context_lines)
            .collect();

        matches.push(SearchMatch {
            session_id: session_id.to_string(),
            metadata: metadata.clone(),
            line_number: *line_number,
            event_type: ev.kind.clone(),
            excerpt: excerpt(text, range, settings.excerpt_lead, settings.excerpt_trail),
            context_before,
            context_after,
        });
    }
    matches
}

/// Read and search one transcript file.
pub fn scan_file(
    path: &Path,
    query: &Query,
    filter: RoleFilter,
    settings: &ScanSettings,
) -> Result<Vec<SearchMatch>> {
    let content = std::fs::read_to_string(path)?;
    let session_id = crate::search::discover::session_id(path);
    Ok(scan_content(&session_id, &content, query, filter, settings))
}
