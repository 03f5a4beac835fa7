//! Session transcript search.
//!
//! Pipeline: [`discover`] the transcript files, [`scan`] each one
//! sequentially, then group the matches per session for [`render`].

pub mod discover;
pub mod render;
pub mod scan;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub use discover::{DiscoverOptions, discover};
pub use scan::{Query, RoleFilter, ScanSettings, SearchMatch, SessionMetadata};

use crate::config::SearchConfig;
use crate::error::Result;

/// Everything a search needs besides the query.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub root: PathBuf,
    pub discover: DiscoverOptions,
    pub filter: RoleFilter,
    pub settings: ScanSettings,
}

impl SearchOptions {
    /// Options from the `[search]` config section, rooted at its
    /// `transcript_root`.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            root: crate::config::expand_path(&config.transcript_root),
            discover: DiscoverOptions {
                subagent_prefix: config.subagent_prefix.clone(),
                max_age: None,
            },
            filter: RoleFilter::Both,
            settings: ScanSettings {
                context_lines: config.context_lines,
                excerpt_lead: config.excerpt_lead,
                excerpt_trail: config.excerpt_trail,
                context_chars: config.context_chars,
            },
        }
    }
}

/// Outcome of a full search.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub files_scanned: usize,
    pub matches: Vec<SearchMatch>,
    /// Files that could not be read, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Matches of one session.
#[derive(Debug)]
pub struct SessionGroup<'a> {
    pub session_id: &'a str,
    pub metadata: &'a SessionMetadata,
    pub matches: Vec<&'a SearchMatch>,
}

impl ScanReport {
    /// Group matches per session, oldest session first.
    ///
    /// Unknown creation times sort as the empty string (first). ISO-8601
    /// timestamps compare correctly as strings. The sort is stable, so
    /// sessions with equal timestamps keep discovery order.
    pub fn sessions(&self) -> Vec<SessionGroup<'_>> {
        let mut groups: Vec<SessionGroup<'_>> = Vec::new();
        for m in &self.matches {
            match groups.iter_mut().find(|g| g.session_id == m.session_id) {
                Some(group) => group.matches.push(m),
                None => groups.push(SessionGroup {
                    session_id: &m.session_id,
                    metadata: &m.metadata,
                    matches: vec![m],
                }),
            }
        }
        groups.sort_by(|a, b| {
            let a = a.metadata.created.as_deref().unwrap_or("");
            let b = b.metadata.created.as_deref().unwrap_or("");
            a.cmp(b)
        });
        groups
    }
}

/// Search every transcript under `options.root`.
///
/// A missing root is fatal. An unreadable file is logged, recorded in
/// [`ScanReport::skipped`], and the search moves on.
pub fn search(query: &Query, options: &SearchOptions, now: SystemTime) -> Result<ScanReport> {
    let files = discover(&options.root, &options.discover, now)?;
    log::info!(
        "searching {} transcript(s) under {} for {:?}",
        files.len(),
        options.root.display(),
        query.as_str()
    );

    let mut report = ScanReport::default();
    for path in &files {
        match scan::scan_file(path, query, options.filter, &options.settings) {
            Ok(found) => {
                report.files_scanned += 1;
                report.matches.extend(found);
            }
            Err(e) => {
                log::warn!("skipping {}: {e}", path.display());
                report.skipped.push((path.clone(), e.to_string()));
            }
        }
    }

    log::info!(
        "found {} match(es) in {} session(s)",
        report.matches.len(),
        report.sessions().len()
    );
    Ok(report)
}

/// Search `root` with the default settings.
pub fn search_root(root: &Path, query: &Query, filter: RoleFilter) -> Result<ScanReport> {
    let mut options = SearchOptions::from_config(&crate::config::Config::default_config().search);
    options.root = root.to_path_buf();
    options.filter = filter;
    search(query, &options, SystemTime::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(created: Option<&str>) -> SessionMetadata {
        SessionMetadata {
            created: created.map(str::to_string),
            ..Default::default()
        }
    }

    fn hit(session: &str, created: Option<&str>, line: usize) -> SearchMatch {
        SearchMatch {
            session_id: session.into(),
            metadata: meta(created),
            line_number: line,
            event_type: crate::schema::transcript::EventKind::User,
            excerpt: "x".into(),
            context_before: vec![],
            context_after: vec![],
        }
    }

    #[test]
    fn sessions_sorted_oldest_first_unknown_first() {
        let report = ScanReport {
            files_scanned: 3,
            matches: vec![
                hit("new", Some("2025-05-01T00:00:00Z"), 1),
                hit("old", Some("2024-01-01T00:00:00Z"), 4),
                hit("new", Some("2025-05-01T00:00:00Z"), 9),
                hit("unknown", None, 2),
            ],
            skipped: vec![],
        };
        let sessions = report.sessions();
        let ids: Vec<&str> = sessions.iter().map(|g| g.session_id).collect();
        assert_eq!(ids, vec!["unknown", "old", "new"]);
        let lines: Vec<usize> = sessions[2].matches.iter().map(|m| m.line_number).collect();
        assert_eq!(lines, vec![1, 9]);
    }

    #[test]
    fn options_from_config() {
        let config = crate::config::Config::default_config();
        let options = SearchOptions::from_config(&config.search);
        assert_eq!(options.discover.subagent_prefix, "agent-");
        assert_eq!(options.settings.context_lines, 2);
        assert!(options.root.ends_with(".claude/projects"));
    }

    #[test]
    fn unreadable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("good.jsonl"),
            "{\"type\":\"user\",\"message\":{\"content\":\"needle\"}}\n",
        )
        .unwrap();
        // Not UTF-8, so it cannot be read as text.
        std::fs::write(dir.path().join("bad.jsonl"), [0xff, 0xfe, b'\n']).unwrap();

        let query = Query::new("needle").unwrap();
        let report = search_root(dir.path(), &query, RoleFilter::Both).unwrap();
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].0.ends_with("bad.jsonl"));
    }
}
