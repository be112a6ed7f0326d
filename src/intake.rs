//! Upload intake: validate a model file, read it, and produce the analysis
//! the estimator will use.
//!
//! Only `.stl` files are parsed. Every other accepted format, and any STL the
//! analyzer rejects, is quoted from [`ModelAnalysis::fallback`] so a bad file
//! degrades the estimate instead of blocking it.

use std::io::Read as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::Digest as _;

use crate::geometry::{self, ModelAnalysis, VolumeMethod};

/// Extensions accepted at upload, lowercase, without the dot.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["stl", "obj", "3mf", "step", "stp"];

/// Largest accepted upload: 50 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

#[derive(thiserror::Error, Debug, serde::Serialize)]
pub enum IntakeError {
    #[error("File not found")]
    FileNotFound,

    #[error("Unsupported format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("Read failed: {message}")]
    Io { message: String },
}

/// Where a [`LoadedModel`]'s analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// Parsed from the uploaded STL.
    Parsed,
    /// The STL was malformed; placeholder geometry is used.
    Fallback,
    /// Format is accepted but not analyzed; placeholder geometry is used.
    Unanalyzed,
}

/// Upload policy knobs, normally taken from [`crate::config::Settings`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntakeLimits {
    pub max_bytes: u64,
    pub volume_method: VolumeMethod,
}

impl Default for IntakeLimits {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
            volume_method: VolumeMethod::default(),
        }
    }
}

/// A model file that passed intake.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedModel {
    /// Path as given at upload.
    pub path: PathBuf,
    pub size_bytes: u64,
    /// SHA-256 hex digest of the file contents.
    pub checksum: String,
    pub analysis: ModelAnalysis,
    pub source: AnalysisSource,
}

/// Lowercased extension of `path` if it is on the allow-list.
pub fn check_extension(path: &Path) -> Result<String, IntakeError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(IntakeError::UnsupportedFormat { extension: ext })
    }
}

/// Validate, read, checksum and analyze `path`.
///
/// Checks run in order: extension, existence, size. The file is only read
/// once all three pass, and the read itself stops one byte past the limit
/// in case the file grew or is not a regular file.
pub fn load_model(path: &Path, limits: IntakeLimits) -> Result<LoadedModel, IntakeError> {
    let ext = check_extension(path)?;

    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(IntakeError::FileNotFound)
        }
        Err(e) => {
            return Err(IntakeError::Io {
                message: e.to_string(),
            })
        }
    };
    if metadata.len() > limits.max_bytes {
        return Err(IntakeError::TooLarge {
            size: metadata.len(),
            limit: limits.max_bytes,
        });
    }

    let bytes = read_capped(path, limits.max_bytes)?;
    let checksum = format!("{:x}", sha2::Sha256::digest(&bytes));
    let (analysis, source) = analyze_bytes(&ext, &bytes, limits.volume_method);

    tracing::info!(
        path = %path.display(),
        size = %format_file_size(bytes.len() as u64),
        ?source,
        "model accepted"
    );

    Ok(LoadedModel {
        path: path.to_path_buf(),
        size_bytes: bytes.len() as u64,
        checksum,
        analysis,
        source,
    })
}

/// Read at most `max_bytes`; anything longer is [`IntakeError::TooLarge`].
fn read_capped(path: &Path, max_bytes: u64) -> Result<Vec<u8>, IntakeError> {
    let io = |e: std::io::Error| IntakeError::Io {
        message: e.to_string(),
    };
    let file = std::fs::File::open(path).map_err(io)?;
    let mut bytes = Vec::new();
    file.take(max_bytes.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(io)?;
    if bytes.len() as u64 > max_bytes {
        return Err(IntakeError::TooLarge {
            size: bytes.len() as u64,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// [`load_model`] on the blocking thread pool, for async callers.
pub async fn load_model_async(path: PathBuf, limits: IntakeLimits) -> Result<LoadedModel, IntakeError> {
    tokio::task::spawn_blocking(move || load_model(&path, limits))
        .await
        .map_err(|e| IntakeError::Io {
            message: format!("analysis task panicked: {e}"),
        })?
}

/// Analyze an upload's bytes, substituting the fallback model when the
/// format is not STL, the STL is malformed, or its coordinates are not
/// finite.
pub fn analyze_bytes(extension: &str, bytes: &[u8], method: VolumeMethod) -> (ModelAnalysis, AnalysisSource) {
    if extension != "stl" {
        return (ModelAnalysis::fallback(), AnalysisSource::Unanalyzed);
    }
    match geometry::analyze_with(bytes, method) {
        Ok(analysis) if analysis.is_finite() => (analysis, AnalysisSource::Parsed),
        Ok(_) => {
            tracing::warn!("STL has NaN or infinite coordinates; using fallback geometry");
            (ModelAnalysis::fallback(), AnalysisSource::Fallback)
        }
        Err(e) => {
            tracing::warn!(error = %e, "STL analysis failed; using fallback geometry");
            (ModelAnalysis::fallback(), AnalysisSource::Fallback)
        }
    }
}

/// Human-readable size in 1024-based units, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    let mut s = format!("{value:.2}");
    if s.contains('.') {
        s = s.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{s} {}", UNITS[unit])
}
