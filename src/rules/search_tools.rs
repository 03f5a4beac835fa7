use crate::config::SearchToolsConfig;
use crate::eval::{CommandContext, Decision, RuleMatch};
use crate::rules::GuardRule;

/// Denies `find` that does not mention the excluded tree.
pub struct FindExclusionRule {
    exclusion: String,
}

impl FindExclusionRule {
    pub fn from_config(config: &SearchToolsConfig) -> Self {
        Self {
            exclusion: config.required_exclusion.clone(),
        }
    }
}

impl GuardRule for FindExclusionRule {
    fn name(&self) -> &'static str {
        "find-exclusion"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn evaluate(&self, ctx: &CommandContext) -> Option<RuleMatch> {
        if !ctx.starts_with_program("find") || ctx.contains(&self.exclusion) {
            return None;
        }
        Some(self.verdict(
            Decision::Deny,
            format!(
                "find must exclude {ex}: add -not -path \"*/{ex}/*\"",
                ex = self.exclusion
            ),
        ))
    }
}

/// Denies recursive `grep` that does not mention the excluded tree.
pub struct GrepExclusionRule {
    exclusion: String,
}

impl GrepExclusionRule {
    pub fn from_config(config: &SearchToolsConfig) -> Self {
        Self {
            exclusion: config.required_exclusion.clone(),
        }
    }

    fn is_recursive(ctx: &CommandContext) -> bool {
        ctx.has_any_flag(&["--recursive", "--dereference-recursive"])
            || crate::parse::short_flag_cluster_has(&ctx.words, &['r', 'R'])
    }
}

impl GuardRule for GrepExclusionRule {
    fn name(&self) -> &'static str {
        "grep-exclusion"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn evaluate(&self, ctx: &CommandContext) -> Option<RuleMatch> {
        if !ctx.starts_with_program("grep")
            || !Self::is_recursive(ctx)
            || ctx.contains(&self.exclusion)
        {
            return None;
        }
        Some(self.verdict(
            Decision::Deny,
            format!(
                "recursive grep must exclude {ex}: add --exclude-dir={ex}",
                ex = self.exclusion
            ),
        ))
    }
}
