//! Command-line front end over the command handlers.
//!
//! Every command prints a JSON document on stdout. Errors are reported by
//! the binary as `{ kind, message }` JSON on stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{materials, model, quote};
use crate::error::AppError;
use crate::geometry::{box_triangles, encode_binary};
use crate::quote::ServiceType;
use crate::state::AppState;

const SAMPLE_SIZE_MM: f32 = 20.0;

/// STL analysis and price estimates for 3D printing and laser engraving
#[derive(Debug, Parser)]
#[command(name = "sanelquote", version, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Analyze an upload (.stl .obj .3mf .step .stp)
    Analyze {
        /// Model file to analyze
        model: PathBuf,
    },
    /// Price a quote request
    Quote {
        /// TOML quote request
        request: PathBuf,
        /// Model to upload before pricing; placeholder geometry otherwise
        model: Option<PathBuf>,
    },
    /// List catalog materials
    Materials {
        /// fdm, sla or laser; all services when omitted
        #[arg(value_parser = parse_service)]
        service: Option<ServiceType>,
    },
    /// Write a box-shaped binary STL
    Sample {
        /// Output path
        out: PathBuf,
        /// Box size in millimetres
        #[arg(long, num_args = 3, value_names = ["W", "H", "D"], value_parser = parse_mm)]
        size: Option<Vec<f32>>,
    },
}

fn parse_service(text: &str) -> Result<ServiceType, String> {
    ServiceType::from_key(text).ok_or_else(|| format!("expected fdm, sla or laser, got {text}"))
}

fn parse_mm(text: &str) -> Result<f32, String> {
    match text.parse::<f32>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(format!(
            "size must be a positive number of millimetres, got {text}"
        )),
    }
}

/// Run `command` against `state` and return the JSON to print.
pub async fn execute(command: Command, state: &AppState) -> Result<String, AppError> {
    match command {
        Command::Analyze { model: path } => {
            let loaded =
                model::open_model_inner(&path.to_string_lossy(), &state.session, state.limits)
                    .await?;
            let summary = model::get_session_snapshot_inner(&state.session)?;
            to_json(&serde_json::json!({
                "upload": loaded,
                "summary": summary,
            }))
        }
        Command::Quote {
            request,
            model: upload,
        } => {
            let text = std::fs::read_to_string(&request)
                .map_err(|e| AppError::Request(format!("{}: {e}", request.display())))?;
            let request = quote::QuoteRequest::from_toml(&text)?;
            if let Some(path) = upload {
                model::open_model_inner(&path.to_string_lossy(), &state.session, state.limits)
                    .await?;
            }
            let document = quote::estimate_quote_inner(&request, &state.session, &state.catalog)?;
            to_json(&document)
        }
        Command::Materials { service } => {
            let listing =
                materials::list_materials_inner(&state.catalog, service.map(|s| s.key()))?;
            to_json(&listing)
        }
        Command::Sample { out, size } => {
            let [w, h, d] = match size.as_deref() {
                Some(&[w, h, d]) => [w, h, d],
                _ => [SAMPLE_SIZE_MM; 3],
            };
            let bytes = encode_binary(&box_triangles(w, h, d), "Binary STL from SanelQuote")?;
            std::fs::write(&out, &bytes)?;
            tracing::info!(path = %out.display(), "sample STL written");
            to_json(&serde_json::json!({
                "path": out.to_string_lossy(),
                "sizeBytes": bytes.len(),
            }))
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Io(e.to_string()))
}
