use anyhow::{Context, Result};
use clap::Parser;
use core_config::{ConfigError, ConfigFile, load_from};
use sift::{Exit, Finder, FinderInit, LineStreamSource, MatchMode, Outcome, SessionOptions};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

const EXIT_SELECTED: i32 = 0;
const EXIT_NOTHING_SELECTED: i32 = 1;
const EXIT_ERROR: i32 = 2;
const EXIT_CANCELLED: i32 = 130;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "sift", version, about = "Interactive incremental filter")]
struct Args {
    /// Items to choose from. When omitted, items are read from stdin one per line.
    items: Vec<String>,
    /// Match tokens as contiguous substrings instead of fuzzy subsequences.
    #[arg(short = 'n', long = "normal", visible_alias = "exact")]
    normal: bool,
    /// Initial query.
    #[arg(short = 'q', long = "query")]
    query: Option<String>,
    /// Finish immediately when the loaded list has exactly one match.
    #[arg(short = '1', long = "select-one")]
    select_one: bool,
    /// Match rows as a percentage (0-100) of the available terminal rows.
    #[arg(long = "height")]
    height: Option<u16>,
    /// Keep the end of each line visible instead of the last match.
    #[arg(long = "keep-right")]
    keep_right: bool,
    /// Prompt text.
    #[arg(long = "label")]
    label: Option<String>,
    /// Only read a line of input; no list is shown.
    #[arg(long = "no-list")]
    no_list: bool,
    /// Print an empty line and the query when nothing is selected.
    #[arg(long = "print-query")]
    print_query: bool,
    /// Configuration file path (overrides discovery of `sift.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Write logs to this file (also `SIFT_LOG`). Filtering follows `RUST_LOG`.
    #[arg(long = "log-file", env = "SIFT_LOG")]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Defaults, then the `[finder]` table, then flags.
    fn session_options(&self, file: &ConfigFile) -> Result<SessionOptions, ConfigError> {
        let mut options = SessionOptions::from_file(file)?;
        if self.normal {
            options.mode = MatchMode::Normal;
        }
        if let Some(query) = &self.query {
            options.query = query.clone();
        }
        if let Some(height) = self.height {
            options.set_height(height)?;
        }
        if let Some(label) = &self.label {
            options.label = label.clone();
        }
        options.select_one |= self.select_one;
        options.keep_right |= self.keep_right;
        options.no_list |= self.no_list;
        Ok(options)
    }
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self, log_file: Option<&Path>) -> Result<()> {
        let Some(path) = log_file else {
            return Ok(());
        };
        let file_name = path
            .file_name()
            .with_context(|| format!("log file path has no file name: {}", path.display()))?;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let file_appender = tracing_appender::rolling::never(dir, file_name);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        match tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // subscriber already installed; dropping the guard stops the writer
            }
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

async fn run(args: Args) -> Result<i32> {
    let config = load_from(args.config.clone())?;
    let options = args.session_options(&config.file)?;
    let no_list = options.no_list;
    let stream_stdin = args.items.is_empty() && !no_list && !io::stdin().is_terminal();
    info!(
        target: "runtime",
        items = args.items.len(),
        stream_stdin,
        no_list,
        config = config.source.is_some(),
        "cli_options_resolved"
    );

    let mut finder =
        Finder::new(FinderInit::with_options(args.items, options)).with_config(&config.file);
    if stream_stdin {
        let debounce = finder.update_debounce();
        finder.register_source(LineStreamSource::new(tokio::io::stdin(), debounce));
        finder = finder.streaming();
    }
    let outcome = finder.run().await?;

    let mut stdout = io::stdout();
    let code = print_outcome(&mut stdout, &outcome, no_list, args.print_query)?;
    stdout.flush()?;
    Ok(code)
}

/// Write the result for the calling pipeline and pick the exit code.
fn print_outcome<W: Write>(
    out: &mut W,
    outcome: &Outcome,
    no_list: bool,
    print_query: bool,
) -> io::Result<i32> {
    if outcome.status == Exit::Cancelled {
        return Ok(EXIT_CANCELLED);
    }
    if no_list {
        writeln!(out, "{}", outcome.query)?;
        return Ok(EXIT_SELECTED);
    }
    match &outcome.selected {
        Some(selected) => {
            writeln!(out, "{}", selected.value)?;
            Ok(EXIT_SELECTED)
        }
        None => {
            if print_query {
                writeln!(out)?;
                writeln!(out, "{}", outcome.query)?;
            }
            Ok(EXIT_NOTHING_SELECTED)
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    let code = match startup.configure_logging(args.log_file.as_deref()) {
        Ok(()) => {
            AppStartup::install_panic_hook();
            match run(args).await {
                Ok(code) => code,
                Err(err) => {
                    tracing::error!(target: "runtime", error = %err, "fatal");
                    eprintln!("sift: {err:#}");
                    EXIT_ERROR
                }
            }
        }
        Err(err) => {
            eprintln!("sift: {err:#}");
            EXIT_ERROR
        }
    };
    info!(target: "runtime", code, "exit");
    drop(startup);
    // a blocking stdin read cannot be cancelled; exiting directly avoids waiting on it
    std::process::exit(code);
}
