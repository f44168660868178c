//! leakgate command-line entry point
//!
//! Thin shell over the engine crates: parses arguments, loads configuration,
//! runs a command and maps the outcome to an exit code.

mod commands;
mod report;

use clap::{ArgGroup, Args, Parser, Subcommand};
use leakgate_rules::DEFAULT_RULESET_NAME;
use report::{OutputFormat, DEFAULT_MAX_EXAMPLES};
use std::path::PathBuf;
use std::process::ExitCode;

/// Nothing forbidden found.
const EXIT_PASS: u8 = 0;
/// A forbidden path or personal information was found.
const EXIT_BLOCKED: u8 = 1;
/// The check could not run.
const EXIT_FATAL: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "leakgate", version, about = "Keep forbidden files and personal information out of version history")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "LEAKGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check files against the forbidden rules and for personal information
    Check(CheckArgs),
    /// Generate a hosted push ruleset blocking forbidden file types
    ExportRuleset(ExportArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Rule file with forbidden sections (defaults to <root>/.gitignore)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Directory the paths are relative to
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Examples shown per category per file
    #[arg(long, default_value_t = DEFAULT_MAX_EXAMPLES)]
    max_examples: usize,

    /// Read newline-separated paths from stdin
    #[arg(long)]
    stdin: bool,

    /// Paths to check
    paths: Vec<String>,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["extensions", "rules"])))]
struct ExportArgs {
    /// File with one forbidden extension per line
    #[arg(long)]
    extensions: Option<PathBuf>,

    /// Rule file whose forbidden patterns are exported
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Ruleset name
    #[arg(long, default_value = DEFAULT_RULESET_NAME)]
    name: String,

    /// Write the ruleset here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "info,leakgate=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!("Starting leakgate v{}", env!("CARGO_PKG_VERSION"));

    let outcome = match cli.command {
        Command::Check(args) => commands::check(cli.config.as_deref(), args).await,
        Command::ExportRuleset(args) => {
            commands::export_ruleset(cli.config.as_deref(), args).map(|()| EXIT_PASS)
        }
    };

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("leakgate: {e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_defaults() {
        let cli = Cli::parse_from(["leakgate", "check", "a.txt", "b.csv"]);
        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.paths, vec!["a.txt", "b.csv"]);
        assert_eq!(args.root, PathBuf::from("."));
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.max_examples, 5);
        assert!(!args.stdin);
    }

    #[test]
    fn test_export_requires_a_source() {
        assert!(Cli::try_parse_from(["leakgate", "export-ruleset"]).is_err());
        assert!(Cli::try_parse_from([
            "leakgate",
            "export-ruleset",
            "--extensions",
            "ext.txt",
            "--rules",
            ".gitignore"
        ])
        .is_err());

        let cli = Cli::parse_from(["leakgate", "export-ruleset", "--extensions", "ext.txt"]);
        let Command::ExportRuleset(args) = cli.command else {
            panic!("expected export-ruleset");
        };
        assert_eq!(args.name, DEFAULT_RULESET_NAME);
    }

    #[test]
    fn test_json_format() {
        let cli = Cli::parse_from(["leakgate", "-v", "check", "--format", "json", "--stdin"]);
        assert!(cli.verbose);
        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.stdin);
    }
}
