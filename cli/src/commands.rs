//! Command implementations.

use crate::report::{render_text, OutputFormat};
use crate::{CheckArgs, ExportArgs, EXIT_BLOCKED, EXIT_PASS};
use anyhow::{Context, Result};
use leakgate_core::AppConfig;
use leakgate_discovery::ReferenceCorpus;
use leakgate_rules::{
    parse_extension_list, PushRuleset, RuleSet, RuleSetLoader, RulesError, SectionMarkers,
};
use leakgate_scanner::{BatchScanner, FsContentSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

/// Rule file used when neither the flag nor the config names one.
const DEFAULT_RULES_FILE: &str = ".gitignore";

/// Run `check` and return the exit code for its verdict.
pub async fn check(config_path: Option<&Path>, args: CheckArgs) -> Result<u8> {
    let config = load_config(config_path)?;

    let rules_path = resolve_rules_path(args.rules.as_deref(), &config, &args.root);
    let rules = load_rules(&rules_path, &config)?;

    let corpus = ReferenceCorpus::load(&config.corpus).context("Failed to load reference corpus")?;

    let mut paths = args.paths;
    if args.stdin {
        let mut input = String::new();
        tokio::io::stdin()
            .read_to_string(&mut input)
            .await
            .context("Failed to read paths from stdin")?;
        paths.extend(parse_path_list(&input));
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling batch");
            on_interrupt.cancel();
        }
    });

    let scanner = BatchScanner::new(Arc::new(rules), Arc::new(corpus))
        .with_max_concurrent(config.scanning.max_concurrent_reads)
        .with_sniff_bytes(config.scanning.binary_sniff_bytes)
        .with_cancellation(cancel);
    let source = FsContentSource::from_config(&args.root, &config.scanning);

    let report = scanner.scan_paths(&source, paths).await?;

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&report, args.max_examples)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(if report.is_blocked() { EXIT_BLOCKED } else { EXIT_PASS })
}

/// Run `export-ruleset`.
pub fn export_ruleset(config_path: Option<&Path>, args: ExportArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let ruleset = build_ruleset(&args, &config)?;
    let json = ruleset.to_json()?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote ruleset '{}' to {}", ruleset.name, path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn build_ruleset(args: &ExportArgs, config: &AppConfig) -> Result<PushRuleset> {
    if let Some(path) = &args.extensions {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(PushRuleset::from_patterns(&args.name, parse_extension_list(&text)));
    }

    let path = args
        .rules
        .as_deref()
        .context("Either --extensions or --rules is required")?;
    let loaded = rule_loader(config).load_file(path)?;
    Ok(PushRuleset::from_rule_set(&args.name, &loaded.rules))
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => {
            let mut config = AppConfig::load_from(path)?;
            config.apply_overrides(|key| std::env::var(key).ok())?;
            config.validate()?;
            config
        }
        None => AppConfig::load_with_env()?,
    };
    Ok(config)
}

/// Flag, then config, then `.gitignore` under the root.
fn resolve_rules_path(flag: Option<&Path>, config: &AppConfig, root: &Path) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| config.rules.path.clone())
        .unwrap_or_else(|| root.join(DEFAULT_RULES_FILE))
}

/// Loader honouring the configured section markers.
fn rule_loader(config: &AppConfig) -> RuleSetLoader {
    RuleSetLoader::new(SectionMarkers::new(
        config.rules.begin_marker.as_str(),
        config.rules.end_marker.as_str(),
    ))
}

fn load_rules(path: &Path, config: &AppConfig) -> Result<RuleSet> {
    match rule_loader(config).load_file(path) {
        Ok(loaded) => {
            tracing::debug!(
                "Loaded {} rules from {} section(s) of {}",
                loaded.rules.len(),
                loaded.sections,
                path.display()
            );
            Ok(loaded.rules)
        }
        Err(RulesError::EmptyRuleSet { exceptions }) if !config.rules.empty_is_error => {
            tracing::warn!(
                "No forbidden patterns in {} ({} exceptions), nothing will be blocked by path",
                path.display(),
                exceptions
            );
            Ok(RuleSet::empty())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load rules from {}", path.display())),
    }
}

/// One path per line; blank lines skipped.
fn parse_path_list(input: &str) -> impl Iterator<Item = String> + '_ {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}
