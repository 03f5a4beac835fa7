use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::eval::RuleMatch;

/// The JSON document a PreToolUse hook receives on stdin.
///
/// Unknown fields (session_id, cwd, ...) are ignored.
#[derive(Debug, Deserialize, Default)]
pub struct HookInput {
    pub tool_name: Option<String>,
    pub tool_input: Option<ToolInput>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ToolInput {
    pub command: Option<String>,
}

impl HookInput {
    /// Parse and validate raw stdin. Anything that is not a JSON object of
    /// the expected shape is an [`Error::InputParse`].
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(Error::InputParse)
    }

    /// The command to evaluate; missing means empty.
    pub fn command(&self) -> &str {
        self.tool_input
            .as_ref()
            .and_then(|t| t.command.as_deref())
            .unwrap_or("")
    }
}

/// Hook protocol envelope written to stdout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookOutput {
    pub hook_specific_output: HookSpecificOutput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: String,
    pub permission_decision: &'static str,
    pub permission_decision_reason: String,
}

/// Minimal decision document, used when no hook event name is given.
#[derive(Debug, Serialize)]
pub struct PlainDecision {
    pub decision: &'static str,
    pub reason: String,
}

/// Render a verdict as the single JSON line the host expects.
///
/// With an event name the hook envelope is used; without one, the plain
/// `{decision, reason}` shape.
pub fn render_decision(result: &RuleMatch, hook_event_name: Option<&str>) -> Result<String> {
    let rendered = match hook_event_name {
        Some(event) => serde_json::to_string(&HookOutput {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: event.to_string(),
                permission_decision: result.decision.as_str(),
                permission_decision_reason: result.reason.clone(),
            },
        }),
        None => serde_json::to_string(&PlainDecision {
            decision: result.decision.as_str(),
            reason: result.reason.clone(),
        }),
    };
    rendered.map_err(Error::Output)
}
