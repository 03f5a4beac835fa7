//! Transcript event shape.
//!
//! Transcripts are newline-delimited JSON written by the assistant host, one
//! event per line:
//!
//! ```text
//! {"type":"summary","summary":"Fix flaky test"}
//! {"type":"user","cwd":"/repo","timestamp":"...","message":{"content":"hello"}}
//! {"type":"assistant","message":{"content":[{"type":"text","text":"hi"},{"type":"tool_use"}]}}
//! ```
//!
//! Parsing never fails: a line that is not a JSON object becomes
//! [`EventKind::ParseError`], and fields with unexpected types are dropped
//! individually instead of poisoning the whole event.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// The `type` discriminator of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    User,
    Assistant,
    Agent,
    Summary,
    /// Any other `type` (progress, system, file-history-snapshot, ...).
    Other(String),
    /// The line is not a JSON object.
    ParseError,
}

impl EventKind {
    fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("user") => EventKind::User,
            Some("assistant") => EventKind::Assistant,
            Some("agent") => EventKind::Agent,
            Some("summary") => EventKind::Summary,
            Some(other) => EventKind::Other(other.to_string()),
            None => EventKind::Other("unknown".to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::User => "user",
            EventKind::Assistant => "assistant",
            EventKind::Agent => "agent",
            EventKind::Summary => "summary",
            EventKind::Other(tag) => tag,
            EventKind::ParseError => "parse-error",
        }
    }

    /// User, assistant or agent turn.
    pub fn is_conversational(&self) -> bool {
        matches!(self, EventKind::User | EventKind::Assistant | EventKind::Agent)
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One element of a structured message body.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        text: String,
    },
    #[serde(rename = "tool_use")]
    ToolUse,
    #[serde(rename = "tool_result")]
    ToolResult,
    // thinking, image, ...
    #[serde(other)]
    Unknown,
}

/// A message body: plain text or a list of blocks.
#[derive(Debug, Clone)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    /// Blocks that fail to deserialize are skipped one by one.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(MessageContent::Text(s.clone())),
            Value::Array(items) => Some(MessageContent::Blocks(
                items
                    .iter()
                    .filter_map(|b| ContentBlock::deserialize(b).ok())
                    .collect(),
            )),
            _ => None,
        }
    }
}

/// One parsed transcript line.
#[derive(Debug, Clone)]
pub struct TranscriptEvent {
    pub kind: EventKind,
    pub cwd: Option<String>,
    pub timestamp: Option<String>,
    /// Set on `summary` events.
    pub summary: Option<String>,
    pub content: Option<MessageContent>,
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

impl TranscriptEvent {
    /// Parse one line; never fails.
    pub fn parse(line: &str) -> Self {
        match serde_json::from_str::<Value>(line) {
            Ok(value) if value.is_object() => Self::from_value(&value),
            _ => Self::parse_error(),
        }
    }

    fn parse_error() -> Self {
        Self {
            kind: EventKind::ParseError,
            cwd: None,
            timestamp: None,
            summary: None,
            content: None,
        }
    }

    fn from_value(value: &Value) -> Self {
        Self {
            kind: EventKind::from_tag(value.get("type").and_then(Value::as_str)),
            cwd: string_field(value, "cwd"),
            timestamp: string_field(value, "timestamp"),
            summary: string_field(value, "summary"),
            content: value
                .pointer("/message/content")
                .and_then(MessageContent::from_value),
        }
    }

    /// Searchable text of the event.
    ///
    /// A plain-string body is the text. For block bodies only `text` blocks
    /// count (newline-joined); tool calls and tool results are never
    /// searchable. `None` when nothing non-empty remains.
    pub fn text(&self) -> Option<String> {
        let text = match self.content.as_ref()? {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        };
        if text.trim().is_empty() { None } else { Some(text) }
    }

    /// A user event typed by the human (string body, not a tool-result array).
    pub fn is_human_message(&self) -> bool {
        self.kind == EventKind::User && matches!(self.content, Some(MessageContent::Text(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_string_content() {
        let ev = TranscriptEvent::parse(
            r#"{"type":"user","cwd":"/repo","timestamp":"2025-01-01T00:00:00Z","message":{"role":"user","content":"hello world"}}"#,
        );
        assert_eq!(ev.kind, EventKind::User);
        assert_eq!(ev.cwd.as_deref(), Some("/repo"));
        assert_eq!(ev.text().as_deref(), Some("hello world"));
        assert!(ev.is_human_message());
    }

    #[test]
    fn assistant_blocks_join_text_only() {
        let ev = TranscriptEvent::parse(
            r#"{"type":"assistant","message":{"content":[
                {"type":"text","text":"first"},
                {"type":"tool_use","id":"t1","name":"Bash","input":{"command":"ls"}},
                {"type":"thinking","thinking":"hmm"},
                {"type":"text","text":"second"}
            ]}}"#,
        );
        assert_eq!(ev.kind, EventKind::Assistant);
        assert_eq!(ev.text().as_deref(), Some("first\nsecond"));
        assert!(!ev.is_human_message());
    }

    #[test]
    fn tool_result_only_has_no_text() {
        let ev = TranscriptEvent::parse(
            r#"{"type":"user","message":{"content":[{"type":"tool_result","tool_use_id":"t1","content":"hello output"}]}}"#,
        );
        assert_eq!(ev.kind, EventKind::User);
        assert_eq!(ev.text(), None);
        assert!(!ev.is_human_message());
    }

    #[test]
    fn summary_event() {
        let ev = TranscriptEvent::parse(
            r#"{"type":"summary","summary":"Fix the build","leafUuid":"x"}"#,
        );
        assert_eq!(ev.kind, EventKind::Summary);
        assert_eq!(ev.summary.as_deref(), Some("Fix the build"));
        assert_eq!(ev.text(), None);
    }

    #[test]
    fn malformed_line() {
        let ev = TranscriptEvent::parse(r#"{"type":"user","message":"#);
        assert_eq!(ev.kind, EventKind::ParseError);
        assert_eq!(ev.kind.as_str(), "parse-error");
        assert_eq!(ev.text(), None);
    }

    #[test]
    fn non_object_is_parse_error() {
        assert_eq!(TranscriptEvent::parse("42").kind, EventKind::ParseError);
    }

    #[test]
    fn unknown_type_is_kept() {
        let ev = TranscriptEvent::parse(r#"{"type":"file-history-snapshot"}"#);
        assert_eq!(ev.kind, EventKind::Other("file-history-snapshot".into()));
        assert_eq!(ev.kind.as_str(), "file-history-snapshot");
    }

    #[test]
    fn wrong_typed_fields_are_dropped() {
        let ev =
            TranscriptEvent::parse(r#"{"type":"user","cwd":7,"message":{"content":"still here"}}"#);
        assert_eq!(ev.cwd, None);
        assert_eq!(ev.text().as_deref(), Some("still here"));
    }

    #[test]
    fn malformed_block_is_skipped() {
        let ev = TranscriptEvent::parse(
            r#"{"type":"assistant","message":{"content":["bare string",{"type":"text","text":"kept"}]}}"#,
        );
        assert_eq!(ev.text().as_deref(), Some("kept"));
    }

    #[test]
    fn kind_serializes_as_tag() {
        assert_eq!(serde_json::to_string(&EventKind::ParseError).unwrap(), "\"parse-error\"");
        assert_eq!(serde_json::to_string(&EventKind::User).unwrap(), "\"user\"");
    }
}
