pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod geometry;
pub mod intake;
pub mod quote;
pub mod state;

use config::Settings;
use error::AppError;
use state::AppState;

/// SanelQuote library entry point.
///
/// Everything the binary does lives here so it can be tested and referenced
/// by the thin `main.rs` wrapper, which parses `cli` first so clap can
/// print help and usage errors itself.
pub async fn run(cli: cli::Cli) -> Result<(), AppError> {
    let settings = Settings::load_default()?;

    // ── Tracing setup (must happen before anything else) ────────────────────
    //
    // Logs are written to a rolling-never (single) file in the OS data dir
    // unless `log_dir` is set in the settings file:
    //   Linux    ~/.local/share/sanelquote/sanelquote.log
    //   macOS    ~/Library/Application Support/sanelquote/sanelquote.log
    //   Windows  %LOCALAPPDATA%\sanelquote\sanelquote.log
    //
    // Log level is controlled by the RUST_LOG environment variable;
    // defaults to INFO when the variable is absent. Stdout stays reserved
    // for command output.
    let log_dir = settings.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "sanelquote.log");
    let (non_blocking, _tracing_guard) = tracing_appender::non_blocking(file_appender);

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .try_init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "SanelQuote starting");

    // ── Application state ────────────────────────────────────────────────────
    let state = AppState::from_settings(&settings)?;

    // ── Dispatch ─────────────────────────────────────────────────────────────
    let output = cli::execute(cli.command, &state).await.map_err(|e| {
        tracing::error!(error = %e, "command failed");
        e
    })?;
    println!("{output}");
    Ok(())
}
