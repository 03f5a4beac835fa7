use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Which transcript files a search should visit.
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// File-name prefix of subagent transcripts (skipped).
    pub subagent_prefix: String,
    /// Only files modified within this window of `now`.
    pub max_age: Option<Duration>,
}

impl DiscoverOptions {
    /// A `--days N` window.
    pub fn days(days: u64) -> Duration {
        Duration::from_secs(days.saturating_mul(24 * 60 * 60))
    }
}

/// Enumerate session transcripts under `root`, sorted by path.
///
/// Subagent transcripts and files older than `max_age` (relative to `now`)
/// are left out. Unreadable directory entries are logged and skipped; only a
/// missing root is fatal.
pub fn discover(root: &Path, options: &DiscoverOptions, now: SystemTime) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::Environment {
            path: root.to_path_buf(),
        });
    }

    let cutoff = options.max_age.and_then(|age| now.checked_sub(age));
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
            continue;
        }
        let is_subagent = !options.subagent_prefix.is_empty()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(&options.subagent_prefix));
        if is_subagent {
            continue;
        }
        if let Some(cutoff) = cutoff {
            let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
            match modified {
                Some(mtime) if mtime >= cutoff => {}
                Some(_) => continue,
                None => {
                    log::warn!("no modification time for {}, skipping", path.display());
                    continue;
                }
            }
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    log::debug!("discovered {} transcript(s) under {}", files.len(), root.display());
    Ok(files)
}

/// Session id of a transcript: its file stem.
pub fn session_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
