//! aibom-diff: AIBOM comparison and risk analysis tool
//!
//! Compares AI Bills of Materials and classifies the changes into risk findings.

#![allow(clippy::needless_pass_by_value)]

use aibom_diff::{
    analysis::ComparisonMode,
    cli::{self, exit_codes},
    config::{AppConfig, AppConfigBuilder, ConfigPreset, CONFIG_FILE_NAMES},
    reports::ReportFormat,
    risk::Severity,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "aibom-diff")]
#[command(author = "Binarly.io")]
#[command(version)]
#[command(about = "AIBOM comparison and risk analysis tool", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Analysis completed
    1  A document or pair failed (with --fail-on-partial) / invalid document (validate)
    2  A finding reached the --fail-on severity
    3  Error occurred

EXAMPLES:
    # Compare a new model release against the previous one
    aibom-diff analyze model-v1.aibom.json model-v2.aibom.json

    # CI/CD gate: fail on high or critical findings
    aibom-diff analyze v1.json v2.json -o json --fail-on high

    # Compare every document against every other one
    aibom-diff analyze a.json b.json c.json --mode all-pairs")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `analyze` subcommand
#[derive(Parser)]
struct AnalyzeArgs {
    /// AIBOM documents to compare (the first is the default baseline)
    #[arg(required = true, num_args = 2..)]
    documents: Vec<PathBuf>,

    /// Start from a named configuration profile (default, strict, permissive, ci-cd)
    #[arg(long, value_parser = parse_preset)]
    profile: Option<ConfigPreset>,

    /// How pairs are formed
    #[arg(short, long, value_enum)]
    mode: Option<ComparisonMode>,

    /// Index of the baseline document (baseline mode)
    #[arg(long)]
    baseline: Option<usize>,

    /// Fuzzy matching preset (strict, balanced, permissive)
    #[arg(long)]
    fuzzy_preset: Option<String>,

    /// Fuzzy match threshold in [0, 1] (overrides the preset)
    #[arg(long)]
    threshold: Option<f64>,

    /// Comma-separated rule categories to enable
    #[arg(long, value_delimiter = ',')]
    rules: Option<Vec<String>>,

    /// Comma-separated model formats considered unsafe to load
    #[arg(long, value_delimiter = ',')]
    unsafe_formats: Option<Vec<String>>,

    /// Advisory feed file (YAML or JSON)
    #[arg(long)]
    advisories: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Attach rule-based narrative insights to the report
    #[arg(long)]
    insights: bool,

    /// Exit with code 2 when a finding reaches this severity
    #[arg(long, value_parser = parse_severity)]
    fail_on: Option<Severity>,

    /// Exit with code 1 when a document or pair failed
    #[arg(long)]
    fail_on_partial: bool,

    /// Maximum number of pairs analyzed concurrently
    #[arg(long)]
    max_parallel_pairs: Option<usize>,

    /// Time box for each external call (e.g. 30s, 500ms, 2m)
    #[arg(long)]
    timeout: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare AIBOM documents and classify the changes
    Analyze(AnalyzeArgs),

    /// Check that AIBOM documents parse
    Validate {
        /// AIBOM documents to validate
        #[arg(required = true)]
        documents: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "summary")]
        output: ReportFormat,

        /// Output file path (stdout if not specified)
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,
    },

    /// Show, discover, or generate configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Print an example configuration file
    Example {
        /// Include every option with its default value
        #[arg(long)]
        full: bool,
    },
    /// Generate JSON Schema for the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    Severity::from_str(s)
}

fn parse_preset(s: &str) -> Result<ConfigPreset, String> {
    ConfigPreset::from_name(s).ok_or_else(|| {
        let names: Vec<&str> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
        format!("unknown profile '{s}' (expected one of: {})", names.join(", "))
    })
}

/// Apply CLI flags on top of the loaded configuration.
fn build_config(base: AppConfig, args: &AnalyzeArgs, quiet: bool) -> AppConfig {
    let base = match args.profile {
        Some(preset) => AppConfig::from_preset(preset),
        None => base,
    };
    let mut builder = AppConfigBuilder::from_config(base);

    if let Some(mode) = args.mode {
        builder = builder.comparison_mode(mode);
    }
    if args.baseline.is_some() {
        builder = builder.baseline(args.baseline);
    }
    if let Some(preset) = &args.fuzzy_preset {
        builder = builder.fuzzy_preset(preset.clone());
    }
    if let Some(threshold) = args.threshold {
        builder = builder.fuzzy_match_threshold(threshold);
    }
    if let Some(rules) = &args.rules {
        builder = builder.rule_set(rules.iter().map(|r| r.trim().to_string()));
    }
    if let Some(formats) = &args.unsafe_formats {
        builder = builder.unsafe_formats(formats.iter().map(|f| f.trim().to_string()));
    }
    if args.advisories.is_some() {
        builder = builder.advisories(args.advisories.clone());
    }
    if let Some(format) = args.output {
        builder = builder.output_format(format);
    }
    if args.output_file.is_some() {
        builder = builder.output_file(args.output_file.clone());
    }
    if args.insights {
        builder = builder.insights(true);
    }
    if args.fail_on.is_some() {
        builder = builder.fail_on(args.fail_on);
    }
    if args.fail_on_partial {
        builder = builder.fail_on_partial(true);
    }
    if let Some(n) = args.max_parallel_pairs {
        builder = builder.max_parallel_pairs(n);
    }
    if let Some(timeout) = &args.timeout {
        builder = builder.timeout_per_pair(timeout.clone());
    }
    if quiet {
        builder = builder.quiet(true);
    }
    builder.build()
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::ERROR
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Analyze(args) => {
            let (file_config, loaded_from) =
                aibom_diff::config::load_or_default(cli.config.as_deref())?;
            if let Some(path) = &loaded_from {
                tracing::debug!("Loaded config from {}", path.display());
            }
            let app = build_config(file_config, &args, cli.quiet);
            cli::run_analyze(cli::AnalyzeConfig {
                documents: args.documents,
                app,
                no_color: cli.no_color,
            })
        }

        Commands::Validate {
            documents,
            output,
            output_file,
        } => cli::run_validate(documents, output, output_file, cli.quiet),

        Commands::Config { action } => {
            run_config(action, cli.config)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn run_config(action: ConfigAction, explicit: Option<PathBuf>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let (config, loaded_from) =
                aibom_diff::config::load_or_default(explicit.as_deref())?;
            if let Some(path) = &loaded_from {
                eprintln!("# Loaded from: {}", path.display());
            } else {
                eprintln!("# No config file found; showing defaults");
            }
            let yaml = serde_yaml_ng::to_string(&config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            let search_paths: [Option<String>; 3] = [
                std::env::current_dir()
                    .ok()
                    .map(|p| p.display().to_string()),
                dirs::config_dir().map(|p| p.join("aibom-diff").display().to_string()),
                dirs::home_dir().map(|p| p.display().to_string()),
            ];
            eprintln!("Config file search paths (in order, git root after current dir):");
            for path in search_paths.into_iter().flatten() {
                eprintln!("  {path}");
            }
            eprintln!();
            eprintln!("Recognized file names:");
            for name in CONFIG_FILE_NAMES {
                eprintln!("  {name}");
            }
            eprintln!();
            match aibom_diff::config::discover_config_file(explicit.as_deref()) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
        ConfigAction::Example { full } => {
            let content = if full {
                aibom_diff::config::generate_full_example_config()
            } else {
                aibom_diff::config::generate_example_config()
            };
            print!("{content}");
        }
        ConfigAction::Schema { output } => {
            let schema = aibom_diff::config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_requires_two_documents() {
        assert!(Cli::try_parse_from(["aibom-diff", "analyze", "a.json"]).is_err());
        assert!(Cli::try_parse_from(["aibom-diff", "analyze", "a.json", "b.json"]).is_ok());
    }

    #[test]
    fn test_cli_flags_override_file_config() {
        let cli = Cli::try_parse_from([
            "aibom-diff",
            "analyze",
            "a.json",
            "b.json",
            "--mode",
            "all-pairs",
            "--rules",
            "unsafe-format,license-change",
            "--fail-on",
            "high",
            "--threshold",
            "0.9",
        ])
        .unwrap();
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        let base = AppConfig::builder().max_parallel_pairs(8).build();
        let config = build_config(base, &args, false);
        assert_eq!(config.comparison.mode, ComparisonMode::AllPairs);
        assert_eq!(config.comparison.max_parallel_pairs, 8);
        assert_eq!(config.rules.rule_set, vec!["unsafe-format", "license-change"]);
        assert_eq!(config.behavior.fail_on, Some(Severity::High));
        assert_eq!(config.matching.fuzzy_match_threshold, Some(0.9));
    }

    #[test]
    fn test_unknown_profile_rejected() {
        assert!(Cli::try_parse_from([
            "aibom-diff", "analyze", "a.json", "b.json", "--profile", "paranoid"
        ])
        .is_err());
    }
}
