pub mod context;
pub mod decision;

pub use context::CommandContext;
pub use decision::{Decision, RuleMatch};

use crate::config::Config;
use crate::rules::GuardRule;
use crate::schema::hook::HookInput;

/// Reason attached when the tool call is not the guarded tool.
pub const NOT_MATCHING_TOOL: &str = "not a matching tool call";
/// Reason attached when no rule had an opinion.
pub const NO_RULE_MATCHED: &str = "no guard rule matched";

/// Ordered registry of guard rules.
///
/// Registration order matters only for ties: among verdicts with equal
/// priority, the earliest registered rule wins.
pub struct RuleRegistry {
    rules: Vec<Box<dyn GuardRule>>,
    target_tool: String,
    escalate_deny: bool,
}

impl RuleRegistry {
    /// Build the registry from configuration.
    pub fn from_config(config: &Config) -> Self {
        use crate::rules::{
            cd::CdRule,
            commit::MultilineCommitRule,
            git::{GitAddChainRule, GitMutationRule},
            search_tools::{FindExclusionRule, GrepExclusionRule},
        };

        let all: Vec<Box<dyn GuardRule>> = vec![
            Box::new(MultilineCommitRule::from_config(&config.git)),
            Box::new(GitAddChainRule::from_config(&config.git)),
            Box::new(GitMutationRule::from_config(&config.git)),
            Box::new(FindExclusionRule::from_config(&config.search_tools)),
            Box::new(GrepExclusionRule::from_config(&config.search_tools)),
            Box::new(CdRule),
        ];

        let rules = all
            .into_iter()
            .filter(|r| !config.rules.disabled.iter().any(|d| d == r.name()))
            .collect();

        Self::with_rules(rules, &config.guard.target_tool, config.settings.escalate_deny)
    }

    /// Build a registry from an explicit rule list.
    pub fn with_rules(
        rules: Vec<Box<dyn GuardRule>>,
        target_tool: &str,
        escalate_deny: bool,
    ) -> Self {
        Self {
            rules,
            target_tool: target_tool.to_string(),
            escalate_deny,
        }
    }

    /// Override the guarded tool name (e.g. from the CLI argument).
    pub fn set_target_tool(&mut self, tool: &str) {
        self.target_tool = tool.to_string();
    }

    /// Override the escalate_deny setting (e.g. from --escalate-deny CLI flag).
    pub fn set_escalate_deny(&mut self, escalate: bool) {
        self.escalate_deny = escalate;
    }

    /// Names of the registered rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Apply escalate_deny: DENY → ASK with annotation.
    fn maybe_escalate(&self, mut result: RuleMatch) -> RuleMatch {
        if self.escalate_deny && result.decision == Decision::Deny {
            result.decision = Decision::Ask;
            result.reason = format!("{} (escalated from deny)", result.reason);
        }
        result
    }

    /// Evaluate a whole hook call: tool-name gate first, then the command.
    pub fn evaluate_call(&self, input: &HookInput) -> RuleMatch {
        let tool = input.tool_name.as_deref().unwrap_or("");
        if !tool.eq_ignore_ascii_case(&self.target_tool) {
            return RuleMatch::allow(NOT_MATCHING_TOOL);
        }
        self.evaluate(input.command())
    }

    /// Evaluate one command string against every rule.
    pub fn evaluate(&self, command: &str) -> RuleMatch {
        let ctx = CommandContext::from_command(command);

        let mut best: Option<RuleMatch> = None;
        for rule in &self.rules {
            let Some(found) = rule.evaluate(&ctx) else {
                continue;
            };
            log::debug!("rule {} fired: {}", found.rule, found.decision.as_str());
            // Strictly greater: an equal-priority latecomer never displaces
            // the earlier rule.
            if best.as_ref().is_none_or(|b| found.priority > b.priority) {
                best = Some(found);
            }
        }

        match best {
            Some(found) => self.maybe_escalate(found),
            None => RuleMatch::allow(NO_RULE_MATCHED),
        }
    }
}
