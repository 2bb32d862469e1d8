//! # Stratocore Services CLI Library
//!
//! Interactive catalog and cart session for Stratocore Services.
//! `main.rs` parses flags and hands over to [`run`].
//!
//! ## Module Organization
//! ```text
//! strato_cli/
//! ├── lib.rs          ◄─── You are here (startup & session loop)
//! ├── cli.rs          ◄─── Command-line flags
//! ├── session.rs      ◄─── Line commands and routes
//! ├── view.rs         ◄─── Plain-text rendering
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── catalog.rs  ◄─── Catalog store behind a RwLock
//! │   ├── cart.rs     ◄─── Cart ledger + change notifications
//! │   └── config.rs   ◄─── Configuration (file, env, flags)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── catalog.rs  ◄─── Browse / reload commands
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   └── history.rs  ◄─── Order history
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────┐ ┌──────────────────────┐ ┌──────────────────┐    │
//! │  │  CatalogState    │ │    CartState         │ │    AppConfig     │    │
//! │  │                  │ │                      │ │                  │    │
//! │  │  • Categories    │ │  • Cart ledger       │ │  • Data source   │    │
//! │  │  • Pricing rules │ │  • watch snapshots   │ │  • Currency      │    │
//! │  │  • Load status   │ │                      │ │                  │    │
//! │  └──────────────────┘ └──────────────────────┘ └──────────────────┘    │
//! │                                                                         │
//! │  Lock order: catalog (read) before cart. No lock across an await.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod session;
pub mod state;
pub mod view;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use strato_data::{CatalogLoader, DirSource, HttpSource, LoadError};

use cli::Cli;
use session::{Outcome, Session};
use state::{AppConfig, DataLocation};

const PROMPT: &str = "strato> ";

/// Runs the session.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging (stderr, RUST_LOG overrides)                     │
/// │  2. Resolve Config: file ──► STRATO_* env ──► flags ──► validate        │
/// │  3. Build Loader: HttpSource (url) or DirSource (dir)                    │
/// │  4. Load catalog, render the home page                                  │
/// │  5. --exec commands, or read stdin until `quit` / EOF                   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    let config = resolve_config(&cli)?;
    let loader = build_loader(&config).context("Invalid data source")?;
    info!(source = %loader.source_description(), "Starting Stratocore Services");

    let mut session = Session::new(config, loader);
    spawn_cart_logger(&session);

    let mut stdout = tokio::io::stdout();
    write_out(&mut stdout, &session.start().await).await?;

    if !cli.exec.is_empty() {
        for line in &cli.exec {
            match session.execute(line).await {
                Outcome::Output(text) => write_out(&mut stdout, &text).await?,
                Outcome::Quit => break,
            }
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write_out(&mut stdout, PROMPT).await?;
        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        match session.execute(&line).await {
            Outcome::Output(text) => write_out(&mut stdout, &text).await?,
            Outcome::Quit => break,
        }
    }

    info!("Session ended");
    Ok(())
}

/// Initializes the tracing subscriber. Logs go to stderr so they never mix
/// with session output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=strato_core=trace` - Trace for one crate only
/// - Default: INFO, or `strato*=debug` with `--verbose`
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "info,strato=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Config file and environment, then flags on top.
pub fn resolve_config(cli: &Cli) -> Result<AppConfig, error::ConfigError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;

    if let Some(url) = &cli.data_url {
        config.override_data_url(url.clone());
    }
    if let Some(dir) = &cli.data_dir {
        config.override_data_dir(dir.clone());
    }

    config.validate()?;
    Ok(config)
}

pub fn build_loader(config: &AppConfig) -> Result<CatalogLoader, LoadError> {
    let loader = match config.data_location() {
        DataLocation::Http(url) => CatalogLoader::new(HttpSource::new(&url)?),
        DataLocation::Dir(dir) => CatalogLoader::new(DirSource::new(dir)),
    };
    Ok(loader)
}

/// Logs every cart change. Ends when the session (and its sender) is dropped.
fn spawn_cart_logger(session: &Session) {
    let mut changes = session.cart().subscribe();
    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let totals = changes.borrow_and_update().totals;
            debug!(
                lines = totals.line_count,
                items = totals.items_count,
                total = totals.total_discounted_price.cents(),
                savings = totals.total_savings.cents(),
                "Cart changed"
            );
        }
    });
}

async fn write_out(stdout: &mut tokio::io::Stdout, text: &str) -> anyhow::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
