/// Context for evaluating a single command.
#[derive(Debug)]
pub struct CommandContext<'a> {
    /// The trimmed command text.
    pub raw: &'a str,
    /// The literal first word (e.g. "git", "cd", "find").
    pub program: &'a str,
    /// All words in the command (tokenized via shlex).
    pub words: Vec<String>,
}

impl<'a> CommandContext<'a> {
    /// Build a CommandContext from a raw command string.
    pub fn from_command(raw: &'a str) -> Self {
        let raw = raw.trim();
        Self {
            raw,
            program: crate::parse::first_word(raw),
            words: crate::parse::tokenize(raw),
        }
    }

    /// Whether the command starts with `program` as a whole word.
    pub fn starts_with_program(&self, program: &str) -> bool {
        self.program == program
    }

    /// Check if any word matches any of the given flags.
    pub fn has_any_flag(&self, flags: &[&str]) -> bool {
        self.words.iter().any(|w| flags.contains(&w.as_str()))
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.raw.contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_splits() {
        let ctx = CommandContext::from_command("  grep -r foo .  ");
        assert_eq!(ctx.raw, "grep -r foo .");
        assert_eq!(ctx.program, "grep");
        assert_eq!(ctx.words, vec!["grep", "-r", "foo", "."]);
    }

    #[test]
    fn program_is_whole_word() {
        let ctx = CommandContext::from_command("cdk deploy");
        assert!(!ctx.starts_with_program("cd"));
        assert!(ctx.starts_with_program("cdk"));
    }

    #[test]
    fn flags() {
        let ctx = CommandContext::from_command("grep --recursive foo .");
        assert!(ctx.has_any_flag(&["--recursive", "-r"]));
        assert!(!ctx.has_any_flag(&["-n"]));
    }
}
