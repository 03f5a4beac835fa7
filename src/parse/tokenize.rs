/// Tokenize a command into words using shlex (POSIX word splitting).
pub fn tokenize(command: &str) -> Vec<String> {
    shlex::split(command).unwrap_or_else(|| {
        // Fallback: simple whitespace splitting if shlex can't parse
        command.split_whitespace().map(String::from).collect()
    })
}

/// The first whitespace-delimited word of a command, exactly as typed.
///
/// No env-var skipping and no basename stripping: guard rules anchor on the
/// literal start of the command.
pub fn first_word(command: &str) -> &str {
    command.split_whitespace().next().unwrap_or("")
}

/// Extract the subcommand that follows `program` in `words`.
///
/// Options are skipped; options listed in `flags_with_value` also consume the
/// next word, so `git -C ../repo status` yields `status`. The `--flag=value`
/// form is a single word and is skipped like any other option.
pub fn subcommand<'a>(
    words: &'a [String],
    program: &str,
    flags_with_value: &[String],
) -> Option<&'a str> {
    let mut iter = words.iter();
    iter.by_ref().find(|w| *w == program)?;
    while let Some(word) = iter.next() {
        if flags_with_value.iter().any(|f| f == word) {
            iter.next();
            continue;
        }
        if word.starts_with('-') {
            continue;
        }
        return Some(word.as_str());
    }
    None
}

/// Whether any short-option cluster (`-rn`, `-R`) contains one of `letters`.
/// Long options (`--regexp`) never count.
pub fn short_flag_cluster_has(words: &[String], letters: &[char]) -> bool {
    words.iter().any(|w| {
        w.len() > 1
            && w.starts_with('-')
            && !w.starts_with("--")
            && w[1..].chars().all(|c| c.is_ascii_alphanumeric())
            && w[1..].chars().any(|c| letters.contains(&c))
    })
}
