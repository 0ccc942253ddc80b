//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::adapters::file_batch_adapter::FileBatchAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_history_adapter::FileHistoryAdapter;
use crate::adapters::file_trade_adapter::{format_directive, FileTradeAdapter};
use crate::adapters::lexicon_analyzer::LexiconAnalyzer;
use crate::domain::batch::{run_batch, BatchReport, ScoringConfig};
use crate::domain::config_validation::{
    read_malformed_line_policy, read_min_weight, read_thresholds, validate_config,
    validate_thresholds,
};
use crate::domain::error::SentraderError;
use crate::ports::config_port::ConfigPort;
use crate::ports::history_port::HistoryPort;

pub const DEFAULT_HISTORY_FILE: &str = ".app.history";
pub const DEFAULT_TRADE_FILE: &str = ".app.trades";

#[derive(Parser, Debug)]
#[command(
    name = "sentrader",
    about = "Scores company sentiment from social-media batches and emits trade signals"
)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score one batch file and write trade directives
    Process {
        batch: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        history: Option<PathBuf>,
        #[arg(long)]
        trades: Option<PathBuf>,
    },
    /// Register a mention token for a canonical company id
    Alias {
        token: String,
        canonical_id: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// Print the accumulated scores
    Show {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Logs go to stderr; `RUST_LOG` directives are honoured on top of the base level.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Process {
            batch,
            config,
            history,
            trades,
        } => run_process(&batch, config.as_ref(), history.as_ref(), trades.as_ref()),
        Command::Alias {
            token,
            canonical_id,
            config,
            history,
        } => run_alias(&token, &canonical_id, config.as_ref(), history.as_ref()),
        Command::Show { config, history } => run_show(config.as_ref(), history.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

/// Loads the INI file if one was given; no file means all defaults.
pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    let Some(path) = path else {
        return Ok(FileConfigAdapter::empty());
    };
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SentraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_scoring_config(adapter: &dyn ConfigPort) -> Result<ScoringConfig, SentraderError> {
    let thresholds = read_thresholds(adapter)?;
    validate_thresholds(&thresholds)?;
    Ok(ScoringConfig {
        thresholds,
        min_weight: read_min_weight(adapter)?,
        malformed_lines: read_malformed_line_policy(adapter)?,
    })
}

pub fn build_analyzer(adapter: &dyn ConfigPort) -> Result<LexiconAnalyzer, SentraderError> {
    match adapter
        .get_string("analyzer", "lexicon")
        .filter(|s| !s.trim().is_empty())
    {
        Some(path) => LexiconAnalyzer::from_file(path.trim()),
        None => Ok(LexiconAnalyzer::default()),
    }
}

/// CLI flag first, then `[files] <key>`, then the built-in default.
pub fn resolve_path(
    override_path: Option<&PathBuf>,
    adapter: &dyn ConfigPort,
    key: &str,
    default: &str,
) -> PathBuf {
    if let Some(path) = override_path {
        return path.clone();
    }
    adapter
        .get_string("files", key)
        .filter(|s| !s.trim().is_empty())
        .map(|s| PathBuf::from(s.trim()))
        .unwrap_or_else(|| PathBuf::from(default))
}

fn history_adapter(
    adapter: &dyn ConfigPort,
    history_override: Option<&PathBuf>,
) -> Result<FileHistoryAdapter, SentraderError> {
    let path = resolve_path(history_override, adapter, "history", DEFAULT_HISTORY_FILE);
    Ok(FileHistoryAdapter::new(path).with_min_weight(read_min_weight(adapter)?))
}

pub fn run_process(
    batch_path: &Path,
    config_path: Option<&PathBuf>,
    history_override: Option<&PathBuf>,
    trades_override: Option<&PathBuf>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match process_batch(&adapter, batch_path, history_override, trades_override) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Wires the file adapters from `adapter` and runs one batch.
pub fn process_batch(
    adapter: &dyn ConfigPort,
    batch_path: &Path,
    history_override: Option<&PathBuf>,
    trades_override: Option<&PathBuf>,
) -> Result<BatchReport, SentraderError> {
    let scoring = build_scoring_config(adapter)?;
    let analyzer = build_analyzer(adapter)?;
    let history = history_adapter(adapter, history_override)?;
    let trades = FileTradeAdapter::new(resolve_path(
        trades_override,
        adapter,
        "trades",
        DEFAULT_TRADE_FILE,
    ));
    let batch = FileBatchAdapter::new(batch_path.to_path_buf());

    run_batch(&history, &batch, &trades, &analyzer, &scoring)
}

fn print_report(report: &BatchReport) {
    println!("Messages:          {}", report.messages);
    if report.skipped_lines > 0 {
        println!("Skipped lines:     {}", report.skipped_lines);
    }
    println!("Unmatched:         {}", report.summary.unmatched_messages);
    println!(
        "Companies updated: {}",
        report.summary.companies_updated.len()
    );
    println!("Directives:        {}", report.directives.len());
    for directive in &report.directives {
        println!("  {}", format_directive(directive));
    }
}

fn run_alias(
    token: &str,
    canonical_id: &str,
    config_path: Option<&PathBuf>,
    history_override: Option<&PathBuf>,
) -> ExitCode {
    let token = token.trim();
    let canonical_id = canonical_id.trim();
    if token.is_empty() || canonical_id.is_empty() {
        eprintln!("error: alias token and canonical id must not be empty");
        return ExitCode::from(2);
    }
    if token.contains(',') || canonical_id.contains(',') {
        eprintln!("error: alias token and canonical id must not contain commas");
        return ExitCode::from(2);
    }

    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let history = match history_adapter(&adapter, history_override) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut state = history.load();
    match state.add_alias(token, canonical_id) {
        Some(previous) if previous != canonical_id => {
            println!("{token}: {previous} -> {canonical_id}");
        }
        Some(_) => println!("{token} already maps to {canonical_id}"),
        None => println!("{token} -> {canonical_id}"),
    }

    if let Err(e) = history.save(&state) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    ExitCode::SUCCESS
}

fn run_show(config_path: Option<&PathBuf>, history_override: Option<&PathBuf>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let history = match history_adapter(&adapter, history_override) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let state = history.load();
    if state.scores.is_empty() {
        println!("No scores recorded.");
    } else {
        println!("{:<24} {:>8} {:>10}  {}", "company", "score", "weight", "updated");
        for record in state.sorted_scores() {
            let score = record
                .mean()
                .map(|m| format!("{m:.3}"))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<24} {:>8} {:>10.3}  {}",
                record.canonical_id, score, record.total_weight, record.last_update
            );
        }
    }
    println!("{} aliases", state.aliases.len());
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(Some(config_path)) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter).and_then(|_| build_analyzer(&adapter).map(|_| ())) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    println!("{} is valid", config_path.display());
    ExitCode::SUCCESS
}
