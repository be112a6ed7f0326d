use std::process::ExitCode;

use clap::Parser;
use sanelquote_lib::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match sanelquote_lib::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let report = serde_json::to_string(&e).unwrap_or_else(|_| e.to_string());
            eprintln!("{report}");
            ExitCode::FAILURE
        }
    }
}
