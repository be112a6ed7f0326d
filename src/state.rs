//! Application state shared by the command handlers.

use std::sync::RwLock;

use crate::catalog::MaterialCatalog;
use crate::config::Settings;
use crate::error::AppError;
use crate::intake::{IntakeLimits, LoadedModel};

/// The quote currently being prepared.
///
/// Holds at most one uploaded model. A new upload replaces it; removing the
/// upload clears it and quotes fall back to placeholder geometry.
#[derive(Debug, Default)]
pub struct QuoteSession {
    pub model: Option<LoadedModel>,
}

/// Root application state.
///
/// Only the session changes at runtime, so only it sits behind a lock.
pub struct AppState {
    pub session: RwLock<QuoteSession>,
    pub catalog: MaterialCatalog,
    pub limits: IntakeLimits,
}

impl AppState {
    pub fn new(catalog: MaterialCatalog, limits: IntakeLimits) -> Self {
        Self {
            session: RwLock::new(QuoteSession::default()),
            catalog,
            limits,
        }
    }

    /// Build state from settings, loading the configured catalog.
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        Ok(Self::new(settings.catalog()?, settings.intake_limits()))
    }
}
