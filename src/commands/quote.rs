//! Quote pricing command.
//!
//! A [`QuoteRequest`] names its material by catalog id. The handler resolves
//! the unit price, validates the request, and prices it against the session's
//! uploaded model (or placeholder geometry when there is none).

use std::collections::BTreeSet;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::MaterialCatalog;
use crate::error::AppError;
use crate::geometry::ModelAnalysis;
use crate::intake::AnalysisSource;
use crate::quote::contact::ContactDetails;
use crate::quote::{
    self, format_price, AddOn, ColorChoice, DeliveryMethod, FormSelection, PriceBreakdown, Quote,
    ServiceSettings, ServiceType, TimeEstimate,
};
use crate::state::QuoteSession;

use super::read_session;

/// A quote request as submitted from the form (or a TOML file on the CLI).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub service: ServiceSettings,
    /// Catalog id of the material, e.g. `"pla"`.
    pub material: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorChoice>,
    #[serde(default)]
    pub add_ons: BTreeSet<AddOn>,
    pub delivery: DeliveryMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactDetails>,
}

impl QuoteRequest {
    /// Parse a request from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::Request(e.to_string()))
    }
}

/// What the quote page prints: rounded prices such as `46,50 RON` and the
/// Romanian turnaround labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDisplay {
    pub material: String,
    pub processing: String,
    pub add_ons: String,
    pub delivery: String,
    pub total: String,
    /// e.g. `2-3 zile`.
    pub processing_window: String,
    /// e.g. `Imediat`.
    pub delivery_window: String,
}

impl From<&Quote> for QuoteDisplay {
    fn from(q: &Quote) -> Self {
        let p: &PriceBreakdown = &q.price;
        Self {
            material: format_price(p.material_cost),
            processing: format_price(p.processing_cost),
            add_ons: format_price(p.add_on_cost),
            delivery: format_price(p.delivery_cost),
            total: format_price(p.total),
            processing_window: q.time.processing_window.label_ro().to_string(),
            delivery_window: q.time.delivery_window.label_ro().to_string(),
        }
    }
}

/// A priced quote, ready to render or send.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDocument {
    pub id: Uuid,
    /// RFC 3339 UTC timestamp.
    pub issued_at: String,
    pub service: ServiceType,
    pub material_name: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorChoice>,
    /// Absent when no model was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_source: Option<AnalysisSource>,
    pub model: ModelAnalysis,
    pub price: PriceBreakdown,
    pub time: TimeEstimate,
    pub display: QuoteDisplay,
}

/// Testable inner logic for pricing a quote request.
///
/// Acquires only a read lock on the session.
pub fn estimate_quote_inner(
    request: &QuoteRequest,
    session_lock: &RwLock<QuoteSession>,
    catalog: &MaterialCatalog,
) -> Result<QuoteDocument, AppError> {
    if let Some(contact) = &request.contact {
        contact.validate()?;
    }

    let service = request.service.service_type();
    let material = catalog.find(service, &request.material)?;
    if let Some(color) = &request.color {
        quote::validate_color(color)?;
        material.check_color(color)?;
    }

    let form = FormSelection {
        service: request.service.clone(),
        material_unit_price: material.price,
        quantity: request.quantity,
        add_ons: request.add_ons.clone(),
        delivery: request.delivery,
    };
    quote::validate(&form)?;

    let (model, model_source) = {
        let session = read_session(session_lock)?;
        match &session.model {
            Some(m) => (m.analysis.clone(), Some(m.source)),
            None => (ModelAnalysis::fallback(), None),
        }
    };

    let result = quote::estimate(&model, &form);
    let id = Uuid::new_v4();

    tracing::info!(
        %id,
        %service,
        material = %material.id,
        quantity = form.quantity,
        total = %format_price(result.price.total),
        "quote issued"
    );

    Ok(QuoteDocument {
        id,
        issued_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        service,
        material_name: material.name.clone(),
        quantity: form.quantity,
        color: request.color.clone(),
        model_source,
        model,
        display: QuoteDisplay::from(&result),
        price: result.price,
        time: result.time,
    })
}
