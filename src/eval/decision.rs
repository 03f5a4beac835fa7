#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Decision {
    Allow,
    Ask,
    Deny,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Ask => "ask",
            Decision::Deny => "deny",
        }
    }
}

/// A verdict produced by one rule (or the engine's implicit default).
#[derive(Debug, Clone)]
pub struct RuleMatch {
    pub decision: Decision,
    pub reason: String,
    /// Higher wins when several rules fire on the same command.
    pub priority: i32,
    /// Name of the rule that produced this verdict; empty for engine defaults.
    pub rule: &'static str,
}

impl RuleMatch {
    /// The engine's own allow, outside any rule.
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::Allow,
            reason: reason.into(),
            priority: 0,
            rule: "",
        }
    }
}
