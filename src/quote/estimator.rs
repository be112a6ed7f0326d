//! Pricing and turnaround policy.
//!
//! [`estimate`] never fails. Inputs are assumed to be inside their documented
//! domains (see [`super::validation`]); values outside them are computed by
//! the same formulas without clamping. In particular the laser speed factor
//! `1.5 − speed/200` turns negative above 300 %.

use crate::geometry::ModelAnalysis;

use super::{AddOn, FormSelection, PriceBreakdown, ProcessingWindow, Quote, ServiceSettings, TimeEstimate};

/// Layer heights at or below this get the fine-quality treatment.
const FINE_LAYER_MM: f64 = 0.1;
/// Layer heights at or above this get the draft-quality treatment.
const DRAFT_LAYER_MM: f64 = 0.3;

/// Price and schedule a job.
pub fn estimate(model: &ModelAnalysis, form: &FormSelection) -> Quote {
    let price = PriceBreakdown::new(
        material_cost(model, form),
        processing_cost(form),
        add_on_cost(form),
        form.delivery.cost(),
    );

    let hours = processing_hours(form);
    let time = TimeEstimate {
        processing_hours: hours,
        processing_window: ProcessingWindow::from_hours(hours),
        delivery_window: form.delivery.window(),
    };

    tracing::trace!(
        service = %form.service_type(),
        quantity = form.quantity,
        total = price.total,
        hours,
        "quote estimated"
    );

    Quote { price, time }
}

/// Material consumed: volume for printing, engraved surface for laser.
fn material_cost(model: &ModelAnalysis, form: &FormSelection) -> f64 {
    let qty = f64::from(form.quantity);
    match form.service {
        // Laser prices are quoted per 100 cm².
        ServiceSettings::LaserEngraving { .. } => {
            model.surface_area_cm2 * (form.material_unit_price / 100.0) * qty
        }
        ServiceSettings::Fdm { .. } | ServiceSettings::Sla { .. } => {
            model.volume_cm3 * form.material_unit_price * qty
        }
    }
}

/// Machine time, billed from a per-piece base rate with multiplicative modifiers.
fn processing_cost(form: &FormSelection) -> f64 {
    let qty = f64::from(form.quantity);
    match form.service {
        ServiceSettings::Fdm {
            layer_height_mm,
            infill_percent,
        } => {
            let mut cost = 15.0 * qty;
            if layer_height_mm <= FINE_LAYER_MM {
                cost *= 1.5;
            } else if layer_height_mm >= DRAFT_LAYER_MM {
                cost *= 0.8;
            }
            cost * (1.0 + f64::from(infill_percent) / 200.0)
        }
        // Post-processing is folded into the SLA base rate.
        ServiceSettings::Sla { .. } => 25.0 * qty,
        ServiceSettings::LaserEngraving {
            power_percent,
            speed_percent,
        } => {
            10.0 * qty
                * (1.0 + f64::from(power_percent) / 500.0)
                * (1.5 - f64::from(speed_percent) / 200.0)
        }
    }
}

fn add_on_cost(form: &FormSelection) -> f64 {
    let qty = f64::from(form.quantity);
    let laser = matches!(form.service, ServiceSettings::LaserEngraving { .. });
    form.add_ons
        .iter()
        .map(|add_on| {
            let per_piece = match (add_on, laser) {
                (AddOn::PostProcessing, true) => 10.0,
                (AddOn::PostProcessing, false) => 20.0,
                (AddOn::Painting, true) => 25.0,
                (AddOn::Painting, false) => 50.0,
                (AddOn::Assembly, _) => 30.0,
            };
            per_piece * qty
        })
        // `Sum for f64` starts at -0.0, which would display as "-0,00 RON".
        .fold(0.0, |acc, cost| acc + cost)
}

/// Shop hours needed before the order is ready. Independent of price.
pub fn processing_hours(form: &FormSelection) -> f64 {
    let qty = f64::from(form.quantity);
    match form.service {
        ServiceSettings::Fdm {
            layer_height_mm, ..
        } => {
            let hours = 8.0 * qty;
            if layer_height_mm <= FINE_LAYER_MM {
                hours * 2.0
            } else if layer_height_mm >= DRAFT_LAYER_MM {
                hours * 0.7
            } else {
                hours
            }
        }
        // Printing plus resin post-processing.
        ServiceSettings::Sla { .. } => 6.0 * qty + 2.0 * qty,
        ServiceSettings::LaserEngraving { .. } => 2.0 * qty,
    }
}
