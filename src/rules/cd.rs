use crate::eval::{CommandContext, Decision, RuleMatch};
use crate::rules::GuardRule;

/// Denies a leading `cd`: the shell's working directory persists across
/// tool calls, so directory changes must stay inside a subshell.
pub struct CdRule;

impl GuardRule for CdRule {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn priority(&self) -> i32 {
        30
    }

    fn evaluate(&self, ctx: &CommandContext) -> Option<RuleMatch> {
        if !ctx.starts_with_program("cd") {
            return None;
        }
        Some(self.verdict(
            Decision::Deny,
            "cd changes the persistent working directory; use a subshell: (cd dir && cmd)",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(cmd: &str) -> Option<Decision> {
        CdRule
            .evaluate(&CommandContext::from_command(cmd))
            .map(|m| m.decision)
    }

    #[test]
    fn deny_cd() {
        assert_eq!(eval("cd /tmp"), Some(Decision::Deny));
        assert_eq!(eval("cd"), Some(Decision::Deny));
        assert_eq!(eval("cd src && cargo build"), Some(Decision::Deny));
    }

    #[test]
    fn subshell_is_silent() {
        assert_eq!(eval("(cd src && ls)"), None);
    }

    #[test]
    fn word_boundary() {
        assert_eq!(eval("cdk deploy"), None);
        assert_eq!(eval("echo cd"), None);
    }
}
