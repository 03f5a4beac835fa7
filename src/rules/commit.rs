use std::sync::LazyLock;

use regex::Regex;

use crate::config::GitConfig;
use crate::eval::{CommandContext, Decision, RuleMatch};
use crate::rules::GuardRule;

static GIT_COMMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bgit\s+commit\b").expect("valid git commit regex"));

static COMMIT_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bcommit\b").expect("valid commit word regex"));

/// `-m`, a short-option cluster containing m (`-am`), or `--message`. The
/// value may be attached (`-m"msg"`, `-am'msg'`, `--message=msg`).
static MESSAGE_FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:-[a-zA-Z]*m|--message(?:[\s=]|$))")
        .expect("valid message flag regex")
});

/// Denies `git commit -m` when the command carries a literal newline.
///
/// Multi-line messages passed inline mangle the hook transcript and the
/// shell history; they belong in a heredoc fed to `-F -`.
pub struct MultilineCommitRule {
    global_flags_with_value: Vec<String>,
}

impl MultilineCommitRule {
    pub fn from_config(config: &GitConfig) -> Self {
        Self {
            global_flags_with_value: config.global_flags_with_value.clone(),
        }
    }

    /// Text following the `commit` subcommand, if the command runs one.
    fn commit_args<'a>(&self, ctx: &CommandContext<'a>) -> Option<&'a str> {
        if let Some(m) = GIT_COMMIT.find(ctx.raw) {
            return Some(&ctx.raw[m.end()..]);
        }
        // git -C repo commit ...
        let sub = crate::parse::subcommand(&ctx.words, "git", &self.global_flags_with_value);
        if sub != Some("commit") {
            return None;
        }
        COMMIT_WORD.find(ctx.raw).map(|m| &ctx.raw[m.end()..])
    }
}

impl GuardRule for MultilineCommitRule {
    fn name(&self) -> &'static str {
        "multiline-commit"
    }

    fn priority(&self) -> i32 {
        120
    }

    fn evaluate(&self, ctx: &CommandContext) -> Option<RuleMatch> {
        if !ctx.raw.contains('\n') {
            return None;
        }
        let args = self.commit_args(ctx)?;
        if !MESSAGE_FLAG.is_match(args) {
            return None;
        }
        Some(self.verdict(
            Decision::Deny,
            "multi-line git commit messages via -m are blocked; \
             write the message with a heredoc: git commit -F - <<'EOF'",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn rule() -> MultilineCommitRule {
        MultilineCommitRule::from_config(&Config::default_config().git)
    }

    fn eval(cmd: &str) -> Option<Decision> {
        rule()
            .evaluate(&CommandContext::from_command(cmd))
            .map(|m| m.decision)
    }

    #[test]
    fn deny_multiline_m() {
        assert_eq!(eval("git commit -m \"subject\n\nbody\""), Some(Decision::Deny));
    }

    #[test]
    fn deny_multiline_am() {
        assert_eq!(eval("git commit -am 'subject\nbody'"), Some(Decision::Deny));
    }

    #[test]
    fn deny_multiline_long_flag() {
        assert_eq!(
            eval("git add . && git commit --message='a\nb'"),
            Some(Decision::Deny)
        );
    }

    #[test]
    fn deny_attached_message() {
        assert_eq!(eval("git commit -m\"subject\n\nbody\""), Some(Decision::Deny));
        assert_eq!(eval("git commit -m'subject\nbody'"), Some(Decision::Deny));
        assert_eq!(eval("git commit -am\"subject\nbody\""), Some(Decision::Deny));
    }

    #[test]
    fn deny_after_global_flags() {
        assert_eq!(eval("git -C repo commit -m \"a\nb\""), Some(Decision::Deny));
        assert_eq!(
            eval("git -c user.name=me --no-pager commit -m 'a\nb'"),
            Some(Decision::Deny)
        );
    }

    #[test]
    fn single_line_is_silent() {
        assert_eq!(eval("git commit -m 'one line'"), None);
        assert_eq!(eval("git commit -m'one line'"), None);
    }

    #[test]
    fn heredoc_file_is_silent() {
        assert_eq!(eval("git commit -F - <<'EOF'\nsubject\n\nbody\nEOF"), None);
        assert_eq!(eval("git commit --amend -F - <<'EOF'\nsubject\nEOF"), None);
    }

    #[test]
    fn multiline_without_commit_is_silent() {
        assert_eq!(eval("echo -m 'a\nb'"), None);
        assert_eq!(eval("git -C repo log -m 'a\nb'"), None);
    }

    #[test]
    fn priority_is_highest() {
        let m = rule()
            .evaluate(&CommandContext::from_command("git commit -m 'a\nb'"))
            .unwrap();
        assert_eq!(m.priority, 120);
        assert_eq!(m.rule, "multiline-commit");
    }
}
