use std::sync::LazyLock;

use regex::Regex;

use crate::config::{AddRequires, GitConfig};
use crate::eval::{CommandContext, Decision, RuleMatch};
use crate::rules::GuardRule;

static GIT_ADD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^git\s+add\b").expect("valid git add regex"));

static GIT_COMMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bgit\s+commit\b").expect("valid git commit regex"));

/// Denies a bare `git add` that is not chained into a commit.
///
/// Staging without committing leaves the index dirty between tool calls.
pub struct GitAddChainRule {
    requires: AddRequires,
}

impl GitAddChainRule {
    pub fn from_config(config: &GitConfig) -> Self {
        Self {
            requires: config.add_requires,
        }
    }
}

impl GuardRule for GitAddChainRule {
    fn name(&self) -> &'static str {
        "git-add-chain"
    }

    fn priority(&self) -> i32 {
        110
    }

    fn evaluate(&self, ctx: &CommandContext) -> Option<RuleMatch> {
        if !GIT_ADD.is_match(ctx.raw) {
            return None;
        }
        let chained = match self.requires {
            AddRequires::Commit => GIT_COMMIT.is_match(ctx.raw),
            AddRequires::Chain => ctx.contains("&&"),
        };
        if chained {
            return None;
        }
        let reason = match self.requires {
            AddRequires::Commit => {
                "git add must be chained with git commit: git add <files> && git commit ..."
            }
            AddRequires::Chain => {
                "git add must be chained with &&: git add <files> && git commit ..."
            }
        };
        Some(self.verdict(Decision::Deny, reason))
    }
}

/// Asks before any git subcommand outside the read-only list.
pub struct GitMutationRule {
    read_only: Vec<String>,
    global_flags_with_value: Vec<String>,
}

impl GitMutationRule {
    pub fn from_config(config: &GitConfig) -> Self {
        Self {
            read_only: config.read_only.clone(),
            global_flags_with_value: config.global_flags_with_value.clone(),
        }
    }
}

impl GuardRule for GitMutationRule {
    fn name(&self) -> &'static str {
        "git-mutation"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn evaluate(&self, ctx: &CommandContext) -> Option<RuleMatch> {
        if !ctx.starts_with_program("git") {
            return None;
        }
        let sub = crate::parse::subcommand(&ctx.words, "git", &self.global_flags_with_value)?;
        if self.read_only.iter().any(|s| s == sub) {
            return None;
        }
        Some(self.verdict(Decision::Ask, format!("git {sub} requires confirmation")))
    }
}
