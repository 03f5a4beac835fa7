use std::io::Write;

use console::Style;

use crate::error::{Error, Result};
use crate::search::scan::{ContextLine, Query, SearchMatch};
use crate::search::{ScanReport, SessionGroup};

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Grouped, human-readable report.
    Report,
    /// JSON array of every match.
    Json,
    /// JSON array of matching session ids.
    SessionIdsJson,
    /// One matching session id per line.
    SessionIdsText,
}

impl OutputMode {
    pub fn from_flags(json: bool, sessions_only: bool) -> Self {
        match (json, sessions_only) {
            (true, true) => OutputMode::SessionIdsJson,
            (true, false) => OutputMode::Json,
            (false, true) => OutputMode::SessionIdsText,
            (false, false) => OutputMode::Report,
        }
    }
}

/// Terminal styling for the report.
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub label: Style,
    pub dim: Style,
    pub highlight: Style,
}

impl Theme {
    /// Colored theme. `console` drops the escapes on its own when stdout is
    /// not a color terminal.
    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            label: Style::new().yellow(),
            dim: Style::new().dim(),
            highlight: Style::new().black().on_yellow().bold(),
        }
    }

    /// No escape codes at all.
    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            label: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
        }
    }
}

/// Write `report` to `out` in the requested mode.
pub fn render<W: Write>(
    out: &mut W,
    report: &ScanReport,
    query: &Query,
    mode: OutputMode,
    theme: &Theme,
) -> Result<()> {
    match mode {
        OutputMode::Json => {
            let json = serde_json::to_string_pretty(&report.matches).map_err(Error::Output)?;
            writeln!(out, "{json}")?;
        }
        OutputMode::SessionIdsJson => {
            let ids = session_ids(report);
            let json = serde_json::to_string_pretty(&ids).map_err(Error::Output)?;
            writeln!(out, "{json}")?;
        }
        OutputMode::SessionIdsText => {
            for id in session_ids(report) {
                writeln!(out, "{id}")?;
            }
        }
        OutputMode::Report => render_report(out, report, query, theme)?,
    }
    Ok(())
}

/// Unique matching session ids, oldest session first.
pub fn session_ids(report: &ScanReport) -> Vec<&str> {
    report.sessions().iter().map(|g| g.session_id).collect()
}

fn render_report<W: Write>(
    out: &mut W,
    report: &ScanReport,
    query: &Query,
    theme: &Theme,
) -> Result<()> {
    let sessions = report.sessions();
    if sessions.is_empty() {
        writeln!(out, "No matches for \"{}\".", query.as_str())?;
        return Ok(());
    }

    writeln!(
        out,
        "Found {} match(es) in {} session(s) for \"{}\"",
        report.matches.len(),
        sessions.len(),
        query.as_str()
    )?;

    for group in &sessions {
        writeln!(out)?;
        render_session(out, group, query, theme)?;
    }
    Ok(())
}

fn render_session<W: Write>(
    out: &mut W,
    group: &SessionGroup<'_>,
    query: &Query,
    theme: &Theme,
) -> Result<()> {
    let meta = group.metadata;
    let header = format!("━━━ Session {} ━━━", group.session_id);
    writeln!(out, "{}", theme.header.apply_to(header))?;

    let resume = match meta.cwd.as_deref() {
        Some(cwd) => format!("cd {} && claude --resume {}", shell_quote(cwd), group.session_id),
        None => format!("claude --resume {}", group.session_id),
    };
    writeln!(out, "  {} {}", theme.label.apply_to("Resume:"), resume)?;

    writeln!(
        out,
        "  {}",
        theme.dim.apply_to(format!(
            "{} | created {} | modified {} | {} message(s)",
            meta.cwd.as_deref().unwrap_or("?"),
            meta.created.as_deref().unwrap_or("?"),
            meta.modified.as_deref().unwrap_or("?"),
            meta.message_count
        ))
    )?;
    if let Some(summary) = &meta.summary {
        writeln!(out, "  {} {}", theme.label.apply_to("Summary:"), summary)?;
    }

    for m in &group.matches {
        render_match(out, m, query, theme)?;
    }
    Ok(())
}

fn render_match<W: Write>(
    out: &mut W,
    m: &SearchMatch,
    query: &Query,
    theme: &Theme,
) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {}",
        theme.label.apply_to(format!("[line {}] {}", m.line_number, m.event_type.as_str()))
    )?;
    for ctx in &m.context_before {
        render_context(out, ctx, theme)?;
    }
    writeln!(out, "  > {}", highlight(&m.excerpt, query, theme))?;
    for ctx in &m.context_after {
        render_context(out, ctx, theme)?;
    }
    Ok(())
}

fn render_context<W: Write>(out: &mut W, ctx: &ContextLine, theme: &Theme) -> Result<()> {
    let line = format!(
        "{:>5} {}: {}",
        ctx.line_number,
        ctx.event_type.as_str(),
        ctx.text
    );
    writeln!(out, "    {}", theme.dim.apply_to(line))?;
    Ok(())
}

/// Wrap every occurrence of the query in the highlight style.
pub fn highlight(text: &str, query: &Query, theme: &Theme) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (start, end) in query.find_all(text) {
        out.push_str(&text[last..start]);
        out.push_str(&theme.highlight.apply_to(&text[start..end]).to_string());
        last = end;
    }
    out.push_str(&text[last..]);
    out
}

/// Single-quote a path for the resume hint when it needs it.
fn shell_quote(path: &str) -> String {
    if path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "/._-~".contains(c))
    {
        path.to_string()
    } else {
        format!("'{}'", path.replace('\'', r"'\''"))
    }
}
