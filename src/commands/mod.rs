//! Command handlers.
//!
//! Sub-modules are grouped by concern:
//! - [`model`]     : upload, remove, and inspect the session's model
//! - [`quote`]     : price a quote request
//! - [`materials`] : material catalog queries
//!
//! Every handler is a plain `_inner` function taking the state it needs, so
//! it can be driven by the CLI or tested without any front end.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::AppError;
use crate::state::QuoteSession;

pub mod materials;
pub mod model;
pub mod quote;

pub(crate) fn read_session(
    lock: &RwLock<QuoteSession>,
) -> Result<RwLockReadGuard<'_, QuoteSession>, AppError> {
    lock.read()
        .map_err(|e| AppError::Io(format!("session lock poisoned: {e}")))
}

pub(crate) fn write_session(
    lock: &RwLock<QuoteSession>,
) -> Result<RwLockWriteGuard<'_, QuoteSession>, AppError> {
    lock.write()
        .map_err(|e| AppError::Io(format!("session lock poisoned: {e}")))
}
