//! Typed shapes for every external message the toolkit reads or writes.
//!
//! Each shape validates once at the boundary and hands the rest of the crate
//! a typed value or an [`Error`](crate::error::Error).

/// PreToolUse hook input and decision output.
pub mod hook;
/// Transcript JSONL events.
pub mod transcript;
