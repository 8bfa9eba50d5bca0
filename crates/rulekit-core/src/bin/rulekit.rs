//! rulekit: command-line front end for the rule engine.
//!
//! Usage:
//!   rulekit parse "age > 30 AND department = 'Sales'"
//!   rulekit eval "age > 30" --record '{"age": 35}'
//!   rulekit combine "age > 30" "department = 'Sales'"
//!   rulekit lint "age > 30 AND age > 30"
//!
//! Results are printed as JSON on stdout. Logging goes to stderr and is
//! controlled by `RUST_LOG` (default `warn`).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::json;

use rulekit_core::{AttributeWhitelist, EngineConfig, Record, RuleEngine};

// ── CLI ─────────────────────────────────────────────────────────────

/// Parse, evaluate, combine and lint rules.
#[derive(Parser, Debug)]
#[command(name = "rulekit", version, about)]
struct Cli {
    /// Path to a JSON engine config file.
    #[arg(long, env = "RULEKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Comma-separated attribute whitelist, overriding the config.
    #[arg(long, env = "RULEKIT_ATTRIBUTES")]
    attributes: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a rule, printing its AST.
    Parse {
        rule: String,
    },
    /// Evaluate a rule against a JSON record.
    Eval {
        rule: String,

        /// Record as a JSON object.
        #[arg(long, conflicts_with = "record_file")]
        record: Option<String>,

        /// File containing the record as a JSON object.
        #[arg(long)]
        record_file: Option<PathBuf>,
    },
    /// Combine rules with AND, printing the combined AST.
    Combine {
        #[arg(required = true)]
        rules: Vec<String>,
    },
    /// Report problems with a rule. Exits non-zero if the rule is invalid.
    Lint {
        rule: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = RuleEngine::new(load_config(&cli)?);

    match cli.command {
        Command::Parse { rule } => {
            let node = engine.create_rule(&rule)?;
            print_json(&json!({ "rule": node.to_string(), "ast": node }))?;
        }
        Command::Eval {
            rule,
            record,
            record_file,
        } => {
            let record = read_record(record, record_file)?;
            let result = engine.evaluate_text(&rule, &record)?;
            print_json(&json!({ "result": result }))?;
        }
        Command::Combine { rules } => {
            let node = engine.combine_rules(&rules)?;
            print_json(&json!({ "rule": node.to_string(), "ast": node }))?;
        }
        Command::Lint { rule } => {
            let report = engine.lint(&rule);
            print_json(&report)?;
            if !report.is_valid {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let mut config = config.apply_env().context("invalid RULEKIT_* environment")?;

    if let Some(list) = &cli.attributes {
        config.attributes = AttributeWhitelist::from_comma_separated(list);
    }
    config.validate()?;
    Ok(config)
}

fn read_record(inline: Option<String>, file: Option<PathBuf>) -> anyhow::Result<Record> {
    let text = match (inline, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read record from {}", path.display()))?,
        (None, None) => bail!("either --record or --record-file is required"),
    };
    serde_json::from_str(&text).context("record must be a JSON object of scalar values")
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
