//! cc-guard: PreToolUse hook for Claude Code.
//!
//! Reads one hook JSON document from stdin and writes exactly one decision
//! document to stdout. Exit code 0 covers every verdict; a non-zero exit
//! (with nothing on stdout) means the input could not be evaluated.
//!
//! Usage: `cc-guard [TOOL_NAME] [HOOK_EVENT_NAME] [--escalate-deny] [--dump-config]`

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use simplelog::LevelFilter;

use cc_toolkit::config::{Config, expand_path};
use cc_toolkit::error::Result;
use cc_toolkit::eval::RuleRegistry;
use cc_toolkit::logging;
use cc_toolkit::schema::hook::{HookInput, render_decision};

#[derive(Debug, Parser)]
#[command(name = "cc-guard", version, about = "Gate shell tool calls with pattern rules")]
struct Cli {
    /// Tool name to guard (defaults to `guard.target_tool`, normally Bash)
    tool_name: Option<String>,

    /// Hook event name; when given, output uses the hookSpecificOutput envelope
    hook_event_name: Option<String>,

    /// Downgrade DENY verdicts to ASK
    #[arg(long)]
    escalate_deny: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    dump_config: bool,
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load();

    if cli.dump_config {
        print!("{}", config.to_toml());
        return Ok(());
    }

    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;

    if !config.guard.debug_input_path.is_empty() {
        logging::dump_input(&expand_path(&config.guard.debug_input_path), &raw);
    }

    let input = HookInput::parse(&raw)?;

    let target = cli.tool_name.as_deref().unwrap_or(&config.guard.target_tool);
    let mut registry = RuleRegistry::from_config(&config);
    registry.set_target_tool(target);
    if cli.escalate_deny {
        registry.set_escalate_deny(true);
    }

    let result = registry.evaluate_call(&input);

    if !config.guard.decision_log.is_empty() {
        logging::log_decision(&expand_path(&config.guard.decision_log), input.command(), &result);
    }

    println!("{}", render_decision(&result, cli.hook_event_name.as_deref())?);
    Ok(())
}

fn main() -> ExitCode {
    logging::init_stderr(LevelFilter::Warn);

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
