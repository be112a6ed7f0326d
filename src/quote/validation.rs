//! Domain checks for [`FormSelection`] fields.
//!
//! [`estimate`](super::estimate) does not call this; it prices whatever it is
//! given. Callers that accept untrusted input run [`validate`] first.

use super::{ColorChoice, FormSelection, ServiceSettings};

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 100;
pub const MAX_PERCENT: u32 = 100;

/// A form field outside the range the estimator is defined for.
#[derive(Debug, Clone, PartialEq, thiserror::Error, serde::Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationError {
    #[error("quantity must be between 1 and 100, got {value}")]
    Quantity { value: u32 },

    #[error("{field} must be between 0 and 100, got {value}")]
    Percent { field: &'static str, value: u32 },

    #[error("layer height must be a positive number of millimetres, got {value}")]
    LayerHeight { value: f64 },

    #[error("material unit price must be positive, got {value}")]
    UnitPrice { value: f64 },

    #[error("custom color must not be empty")]
    CustomColor,
}

/// Check every numeric field; reports the first violation found.
pub fn validate(form: &FormSelection) -> Result<(), ValidationError> {
    if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&form.quantity) {
        return Err(ValidationError::Quantity {
            value: form.quantity,
        });
    }

    if !(form.material_unit_price.is_finite() && form.material_unit_price > 0.0) {
        return Err(ValidationError::UnitPrice {
            value: form.material_unit_price,
        });
    }

    match form.service {
        ServiceSettings::Fdm {
            layer_height_mm,
            infill_percent,
        } => {
            check_layer_height(layer_height_mm)?;
            check_percent("infill", infill_percent)
        }
        ServiceSettings::Sla { layer_height_mm } => check_layer_height(layer_height_mm),
        ServiceSettings::LaserEngraving {
            power_percent,
            speed_percent,
        } => {
            check_percent("laser power", power_percent)?;
            check_percent("laser speed", speed_percent)
        }
    }
}

/// A custom color needs some text; catalog colors are checked against the
/// material by [`crate::catalog::Material::check_color`].
pub fn validate_color(color: &ColorChoice) -> Result<(), ValidationError> {
    match color {
        ColorChoice::Custom(text) if text.trim().is_empty() => Err(ValidationError::CustomColor),
        _ => Ok(()),
    }
}

fn check_layer_height(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::LayerHeight { value })
    }
}

fn check_percent(field: &'static str, value: u32) -> Result<(), ValidationError> {
    if value <= MAX_PERCENT {
        Ok(())
    } else {
        Err(ValidationError::Percent { field, value })
    }
}
