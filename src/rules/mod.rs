//! Guard rules: one independent predicate + verdict per concern.
//!
//! Each rule sees the same [`CommandContext`] and either stays silent (`None`)
//! or returns a [`RuleMatch`] carrying its own priority. Rules never observe
//! each other; the engine picks the winner.

/// `cd` outside a subshell.
pub mod cd;
/// Multi-line `git commit -m` messages.
pub mod commit;
/// `git add` chaining and the git mutation gate.
pub mod git;
/// `find` / `grep -r` without a dependency-tree exclusion.
pub mod search_tools;

use crate::eval::{CommandContext, Decision, RuleMatch};

/// Trait for guard rules.
pub trait GuardRule: Send + Sync {
    /// Stable name used in config (`rules.disabled`) and decision logs.
    fn name(&self) -> &'static str;

    /// Priority attached to every verdict this rule produces.
    fn priority(&self) -> i32;

    /// Evaluate the command; `None` means the rule has no opinion.
    fn evaluate(&self, ctx: &CommandContext) -> Option<RuleMatch>;

    /// Build a verdict stamped with this rule's name and priority.
    fn verdict(&self, decision: Decision, reason: impl Into<String>) -> RuleMatch
    where
        Self: Sized,
    {
        RuleMatch {
            decision,
            reason: reason.into(),
            priority: self.priority(),
            rule: self.name(),
        }
    }
}
