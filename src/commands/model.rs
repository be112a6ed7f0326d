//! Model upload lifecycle for the active quote session.
//!
//! # Error contract
//! Every fallible path returns `Result<_, AppError>`. No `unwrap()` or
//! `expect()` calls are present outside of `#[cfg(test)]`.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::Serialize;

use crate::error::AppError;
use crate::intake::{self, AnalysisSource, IntakeLimits, LoadedModel};
use crate::state::QuoteSession;

use super::{read_session, write_session};

/// What the quote page shows about the current upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub model_path: Option<String>,
    pub model_checksum: Option<String>,
    pub file_size: Option<String>,
    pub analysis_source: Option<AnalysisSource>,
    /// `W × H × D mm`, only for parsed models.
    pub dimensions: Option<String>,
    pub volume_cm3: f64,
    pub surface_area_cm2: f64,
    pub complexity: String,
}

impl From<&QuoteSession> for SessionSnapshot {
    fn from(s: &QuoteSession) -> Self {
        let analysis = s
            .model
            .as_ref()
            .map(|m| m.analysis.clone())
            .unwrap_or_else(crate::geometry::ModelAnalysis::fallback);
        let parsed = s
            .model
            .as_ref()
            .filter(|m| m.source == AnalysisSource::Parsed);

        Self {
            model_path: s
                .model
                .as_ref()
                .map(|m| m.path.to_string_lossy().into_owned()),
            model_checksum: s.model.as_ref().map(|m| m.checksum.clone()),
            file_size: s
                .model
                .as_ref()
                .map(|m| intake::format_file_size(m.size_bytes)),
            analysis_source: s.model.as_ref().map(|m| m.source),
            dimensions: parsed.map(|m| m.analysis.bounding_box.dimensions_label()),
            volume_cm3: analysis.volume_cm3,
            surface_area_cm2: analysis.surface_area_cm2,
            complexity: analysis.complexity.label_ro().to_string(),
        }
    }
}

/// Testable inner logic for opening a model.
///
/// 1. Validates and analyzes the file on the blocking thread pool.
/// 2. Replaces any model already in the session.
/// 3. Returns the [`LoadedModel`] for immediate display.
///
/// The session is left untouched when intake fails.
pub async fn open_model_inner(
    path_str: &str,
    session_lock: &RwLock<QuoteSession>,
    limits: IntakeLimits,
) -> Result<LoadedModel, AppError> {
    let model = intake::load_model_async(PathBuf::from(path_str), limits).await?;

    let mut session = write_session(session_lock)?;
    if let Some(previous) = session.model.replace(model.clone()) {
        tracing::debug!(path = %previous.path.display(), "replaced previous upload");
    }

    Ok(model)
}

/// Testable inner logic for removing the uploaded model.
///
/// Returns `true` when a model was present.
pub fn remove_model_inner(session_lock: &RwLock<QuoteSession>) -> Result<bool, AppError> {
    let mut session = write_session(session_lock)?;
    let removed = session.model.take().is_some();
    if removed {
        tracing::info!("upload removed; quotes use placeholder geometry");
    }
    Ok(removed)
}

/// Testable inner logic for the session snapshot query.
pub fn get_session_snapshot_inner(
    session_lock: &RwLock<QuoteSession>,
) -> Result<SessionSnapshot, AppError> {
    let session = read_session(session_lock)?;
    Ok(SessionSnapshot::from(&*session))
}
