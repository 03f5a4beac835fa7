use std::io::Write;
use std::path::Path;

use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

use crate::eval::RuleMatch;

/// Route `log` records to stderr. Stdout is reserved for results.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_stderr(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

/// Overwrite `path` with the raw hook input for later inspection.
/// Best-effort: failures are logged at debug level and otherwise ignored.
pub fn dump_input(path: &Path, raw: &str) {
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    if let Err(e) = std::fs::write(path, raw) {
        log::debug!("could not write debug input to {}: {e}", path.display());
    }
}

/// Append a decision record to the decision log.
/// Best-effort: failures are silently ignored (logging must never block the hook).
pub fn log_decision(path: &Path, command: &str, result: &RuleMatch) {
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    else {
        return;
    };

    let _ = writeln!(file, "{}", decision_line(command, result, &timestamp_now()));
}

/// One tab-separated log line: timestamp, decision, rule, command, reason.
fn decision_line(command: &str, result: &RuleMatch, ts: &str) -> String {
    // Compact single-line fields for the log (replace newlines with "; ")
    let reason_oneline = result.reason.replace('\n', "; ");
    let cmd_truncated: String = command.chars().take(200).collect::<String>().replace('\n', "; ");
    let rule = if result.rule.is_empty() { "-" } else { result.rule };
    format!(
        "{ts}\t{decision}\t{rule}\t{cmd}\t{reason}",
        decision = result.decision.as_str(),
        cmd = cmd_truncated,
        reason = reason_oneline,
    )
}

fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Decision;

    fn deny() -> RuleMatch {
        RuleMatch {
            decision: Decision::Deny,
            reason: "line one\nline two".into(),
            priority: 120,
            rule: "multiline-commit",
        }
    }

    #[test]
    fn decision_line_is_single_line() {
        let line = decision_line("git commit -m 'a\nb'", &deny(), "2025-01-01T00:00:00Z");
        assert!(!line.contains('\n'));
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields[0], "2025-01-01T00:00:00Z");
        assert_eq!(fields[1], "deny");
        assert_eq!(fields[2], "multiline-commit");
        assert_eq!(fields[3], "git commit -m 'a; b'");
        assert_eq!(fields[4], "line one; line two");
    }

    #[test]
    fn engine_default_has_dash_rule() {
        let line = decision_line("ls", &RuleMatch::allow("ok"), "t");
        assert_eq!(line, "t\tallow\t-\tls\tok");
    }

    #[test]
    fn log_and_dump_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("nested/decisions.log");
        log_decision(&log_path, "cd /", &deny());
        log_decision(&log_path, "cd /", &deny());
        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);

        let dump_path = dir.path().join("nested/input.json");
        dump_input(&dump_path, "{\"a\":1}");
        dump_input(&dump_path, "{\"b\":2}");
        assert_eq!(std::fs::read_to_string(&dump_path).unwrap(), "{\"b\":2}");
    }

    #[test]
    fn unwritable_paths_do_not_panic() {
        dump_input(Path::new("/proc/definitely/not/writable"), "x");
        log_decision(Path::new("/proc/definitely/not/writable"), "ls", &deny());
    }
}
