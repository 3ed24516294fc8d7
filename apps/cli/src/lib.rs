//! # MotoCash CLI
//!
//! Terminal front end over the derivation core and the document store.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     MotoCash CLI Startup                                │
//! │                                                                         │
//! │  1. Parse arguments (clap)                                             │
//! │  2. Initialize tracing (stderr, RUST_LOG)                              │
//! │  3. Load configuration                                                 │
//! │     • defaults → motocash.toml → MOTOCASH_* environment                │
//! │  4. Open the store                                                     │
//! │     • sqlite: pool + migrations                                        │
//! │     • json:   single document file                                     │
//! │  5. Run the command, print to stdout                                   │
//! │  6. On error: message to stderr, exit code 1 or 2                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;

use motocash_store::{Database, JsonFileStore, StateStore, StoreConfig};
use std::io::Write;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{CategoryAction, Cli, Commands, FixedAction, PlanAction, RecordAction};
use commands::Context;
use config::{AppConfig, Backend};
use error::AppResult;

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=motocash=trace` - Show trace for motocash crates only
/// - Default: warnings, plus INFO from motocash crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,motocash=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens the configured backend.
pub async fn open_store(config: &AppConfig) -> AppResult<Box<dyn StateStore>> {
    let path = config.data_path();
    info!(backend = %config.storage.backend, path = %path.display(), "Opening store");

    match config.storage.backend {
        Backend::Sqlite => {
            let db = Database::new(StoreConfig::new(path)).await?;
            Ok(Box::new(db.state()))
        }
        Backend::Json => Ok(Box::new(JsonFileStore::new(path))),
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Runs one command against the configured store.
pub async fn run(cli: Cli, config: &AppConfig, out: &mut dyn Write) -> AppResult<()> {
    debug!(command = ?cli.command, "Running command");

    if let Commands::Config { print } = cli.command {
        return commands::data::config(config, print, out);
    }

    let store = open_store(config).await?;
    let format = config.money_format();
    let ctx = Context {
        store: store.as_ref(),
        format: &format,
    };

    match cli.command {
        Commands::Dashboard { date, json } => {
            let today = commands::metrics::reference_date(date.as_deref())?;
            commands::metrics::dashboard(&ctx, today, json, out).await
        }
        Commands::History { limit, json } => commands::metrics::history(&ctx, limit, json, out).await,
        Commands::Maintenance { json } => commands::metrics::maintenance(&ctx, json, out).await,
        Commands::Report { period, json } => commands::report::report(&ctx, &period, json, out).await,
        Commands::Reconcile { fix } => commands::report::reconcile(&ctx, fix, out).await,
        Commands::Service { id, km } => commands::data::service(&ctx, id, km, out).await,
        Commands::Record { action } => match action {
            RecordAction::Add(fields) => commands::records::add(&ctx, &fields, now_millis(), out).await,
            RecordAction::Edit { id, fields } => commands::records::edit(&ctx, id, &fields, out).await,
            RecordAction::Rm { id } => commands::records::remove(&ctx, id, out).await,
        },
        Commands::Goal { amount } => commands::settings::goal(&ctx, &amount, out).await,
        Commands::Fixed { action } => match action {
            FixedAction::Add { name, amount } => {
                commands::settings::add_fixed(&ctx, &name, &amount, now_millis(), out).await
            }
            FixedAction::Rm { id } => commands::settings::remove_fixed(&ctx, id, out).await,
        },
        Commands::Plan { action } => match action {
            PlanAction::Add { name, interval, last_km } => {
                commands::settings::add_plan_item(&ctx, &name, interval, last_km, now_millis(), out).await
            }
            PlanAction::Rm { id } => commands::settings::remove_plan_item(&ctx, id, out).await,
        },
        Commands::Category { action } => match action {
            CategoryAction::Add { kind, name } => commands::settings::add_category(&ctx, &kind, &name, out).await,
            CategoryAction::Rm { kind, name } => commands::settings::remove_category(&ctx, &kind, &name, out).await,
        },
        Commands::Import { file } => commands::data::import(&ctx, &file, out).await,
        Commands::Export { file } => commands::data::export(&ctx, &file, out).await,
        Commands::Config { print } => commands::data::config(config, print, out),
    }
}
