//! cc-toolkit: guard hooks and transcript search for Claude Code.
//!
//! Two independent tools share this crate:
//!
//! - **`cc-guard`**, a PreToolUse hook. It evaluates a shell command against a
//!   fixed, ordered set of [`rules`] and returns one of
//!   [`eval::Decision::Allow`], [`eval::Decision::Ask`] or
//!   [`eval::Decision::Deny`]. The highest-priority verdict wins and ties go
//!   to the first registered rule.
//! - **`cc-search`**, a case-insensitive search over session transcripts
//!   (`~/.claude/projects/**/<session>.jsonl`) with per-session grouping and
//!   context.
//!
//! # Architecture
//!
//! - **[`eval`]**: rule registry, decision types, command context.
//! - **[`rules`]**: the individual guard rules (git, commit, find/grep, cd).
//! - **[`parse`]**: shlex tokenizer and subcommand extraction.
//! - **[`schema`]**: typed hook input/output and transcript events.
//! - **[`search`]**: transcript discovery, scanning, rendering.
//! - **[`config`]**: embedded defaults + user overlay merge.
//! - **[`logging`]**: stderr logger, decision log, raw-input dump.

/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Error taxonomy.
pub mod error;
/// Evaluation engine: registry, decision aggregation, command context.
pub mod eval;
/// Stderr logging and best-effort hook side files.
pub mod logging;
/// Command tokenizing.
pub mod parse;
/// Guard rule trait and implementations.
pub mod rules;
/// External message shapes.
pub mod schema;
/// Session transcript search.
pub mod search;

use eval::RuleMatch;

/// Build the registry from default config and evaluate a command string.
///
/// This is the main entry point for tests and simple usage.
/// For CLI usage with --escalate-deny or user config, build the registry directly.
pub fn evaluate(command: &str) -> RuleMatch {
    let config = config::Config::default_config();
    let registry = eval::RuleRegistry::from_config(&config);
    registry.evaluate(command)
}
