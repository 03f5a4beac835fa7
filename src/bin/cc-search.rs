//! cc-search: search Claude Code session transcripts.
//!
//! Results go to stdout; progress and diagnostics go to stderr.

use std::process::ExitCode;
use std::time::SystemTime;

use clap::Parser;
use simplelog::LevelFilter;

use cc_toolkit::config::Config;
use cc_toolkit::error::{Error, Result};
use cc_toolkit::logging;
use cc_toolkit::search::render::{OutputMode, Theme, render};
use cc_toolkit::search::{DiscoverOptions, Query, RoleFilter, SearchOptions, search};

#[derive(Debug, Parser)]
#[command(name = "cc-search", version, about = "Search Claude Code session transcripts")]
struct Cli {
    /// Case-insensitive text to look for
    search: Option<String>,

    /// Print matches as JSON
    #[arg(long)]
    json: bool,

    /// Print only the ids of matching sessions
    #[arg(long)]
    sessions_only: bool,

    /// Only match messages from the human
    #[arg(long)]
    user: bool,

    /// Only match messages from the assistant
    #[arg(long)]
    assistant: bool,

    /// Only search sessions modified in the last N days
    #[arg(long, value_name = "N")]
    days: Option<u64>,

    /// Transcript root (defaults to `search.transcript_root`)
    #[arg(long, value_name = "DIR")]
    root: Option<std::path::PathBuf>,

    /// Disable colors in the report
    #[arg(long)]
    no_color: bool,

    /// Verbose diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

const USAGE: &str =
    "cc-search <search-string> [--json] [--sessions-only] [--user] [--assistant] [--days <n>]";

fn run(cli: Cli) -> Result<()> {
    let text = cli
        .search
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::Usage(USAGE.into()))?;

    let config = Config::load();
    let mut options = SearchOptions::from_config(&config.search);
    if let Some(root) = cli.root {
        options.root = root;
    }
    options.discover.max_age = cli.days.map(DiscoverOptions::days);
    options.filter = RoleFilter::from_flags(cli.user, cli.assistant);

    let query = Query::new(&text)?;
    let report = search(&query, &options, SystemTime::now())?;

    let theme = if cli.no_color { Theme::plain() } else { Theme::colored() };
    let mode = OutputMode::from_flags(cli.json, cli.sessions_only);
    let stdout = std::io::stdout();
    render(&mut stdout.lock(), &report, &query, mode, &theme)?;

    if !report.skipped.is_empty() {
        log::warn!("{} transcript(s) could not be read", report.skipped.len());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    logging::init_stderr(if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
