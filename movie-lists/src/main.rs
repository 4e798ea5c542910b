//! movie-lists - browse and create TMDB movie lists from the command line
//!
//! Every command goes through the store: the CLI dispatches the same
//! actions the lists screen and the create form would, and prints the
//! slices afterwards.
//!
//! # Usage
//!
//! ```sh
//! export MOVIE_LISTS_ACCOUNT_ID=... MOVIE_LISTS_API_KEY=... MOVIE_LISTS_SESSION_ID=...
//!
//! # First two pages of the account's lists
//! movie-lists browse --pages 2
//!
//! # Create a list, then show the refreshed first page
//! movie-lists create --name "Noir" --description "Best of the 40s"
//!
//! # Show every dispatched action on exit
//! movie-lists --debug browse
//! ```

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use reel_dispatch::{
    ActionLogConfig, ActionLoggerConfig, ActionLoggerMiddleware, LoggingMiddleware,
};
use tracing_subscriber::EnvFilter;

use movie_lists::screens::{self, AppRuntime, CreateOutcome};
use movie_lists::{
    ApiConfig, AppError, ListSlice, NavigationHandle, RecordingNavigator, TmdbClient,
};

/// Reduced actions go to tracing at debug; `--debug` also records them
type CliMiddleware = (LoggingMiddleware, ActionLoggerMiddleware);

#[derive(Parser, Debug)]
#[command(name = "movie-lists", version)]
#[command(about = "Browse and create TMDB movie lists")]
struct Cli {
    #[command(flatten)]
    api: ApiConfig,

    /// Log filter, e.g. `info` or `movie_lists=debug` (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Record dispatched actions and print them on exit
    #[arg(long, global = true)]
    debug: bool,

    /// Comma-separated globs of action kinds to record, e.g. `FETCH_*`
    #[arg(long, global = true)]
    debug_filter: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the account's lists, page by page
    Browse {
        /// Maximum number of page requests
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Open the detail screen of this list id after loading
        #[arg(long)]
        open: Option<u64>,
    },

    /// Create a list, then reload the first page
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let config = cli.api.validate()?;
    let api = TmdbClient::new(config).map_err(|e| AppError::Client(e.to_string()))?;

    let filter = ActionLoggerConfig::new(cli.debug_filter.as_deref(), None);
    let middleware: CliMiddleware = (
        LoggingMiddleware::new(),
        ActionLoggerMiddleware::with_log(ActionLogConfig::new(200, filter)).active(cli.debug),
    );
    let mut runtime = screens::runtime(Arc::new(api), middleware);

    let mut out = io::stdout().lock();
    let navigator = Arc::new(RecordingNavigator::new());
    let navigation = NavigationHandle::shared(navigator.clone());

    let ok = match cli.command {
        Command::Browse { pages, open } => {
            let slice = screens::browse(&mut runtime, pages.max(1)).await;
            print_lists(&mut out, &slice)?;

            if let Some(id) = open {
                match screens::open_detail(&slice, id, &navigation) {
                    Ok(true) => {}
                    Ok(false) => writeln!(out, "No loaded list with id {}", id)?,
                    Err(err) => tracing::error!(error = %err, "Could not open list"),
                }
            }
            slice.error.is_none()
        }
        Command::Create { name, description } => {
            let outcome = screens::create(&mut runtime, &name, &description, navigation).await;
            print_created(&mut out, &outcome)?;
            outcome.error.is_none()
        }
    };

    let history = navigator.history();
    if !history.is_empty() {
        let route: Vec<String> = history.iter().map(ToString::to_string).collect();
        writeln!(out, "Navigation: {}", route.join(" -> "))?;
    }

    if cli.debug {
        print_action_log(&runtime)?;
    }

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn print_lists(out: &mut impl Write, slice: &ListSlice) -> io::Result<()> {
    if let Some(error) = &slice.error {
        writeln!(out, "Error: {}", error)?;
    }
    if slice.is_empty_result() {
        return writeln!(out, "No result");
    }

    for item in slice.movie_list() {
        writeln!(out, "{:>8}  {} ({} items)", item.id, item.name, item.item_count)?;
        if !item.description.is_empty() {
            writeln!(out, "          {}", item.description)?;
        }
    }
    if let Some(total) = slice.total_pages() {
        writeln!(out, "Page {} of {}", slice.current_page(), total)?;
    }
    Ok(())
}

fn print_created(out: &mut impl Write, outcome: &CreateOutcome) -> io::Result<()> {
    if let Some(error) = &outcome.error {
        return writeln!(out, "Error: {}", error);
    }
    if let Some(created) = &outcome.created {
        writeln!(out, "Created: {}", created)?;
    }
    print_lists(out, &outcome.lists)
}

fn print_action_log(runtime: &AppRuntime<CliMiddleware>) -> io::Result<()> {
    let Some(log) = runtime.middleware().1.log() else {
        return Ok(());
    };

    let mut err = io::stderr().lock();
    writeln!(err, "Actions ({}):", log.len())?;
    for entry in log.entries() {
        let changed = match entry.state_changed {
            Some(true) => "changed",
            Some(false) => "-",
            None => "?",
        };
        writeln!(err, "  #{:<3} {:<8} {}", entry.sequence, changed, entry.summary)?;
    }
    Ok(())
}
