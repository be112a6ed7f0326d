//! Quote price and turnaround estimation.
//!
//! ```text
//! quote/
//! ├── mod.rs        : form selection and result types
//! ├── estimator.rs  : estimate(): pure pricing and time policy
//! ├── validation.rs : numeric domain checks the estimator assumes
//! ├── contact.rs    : customer contact field checks
//! └── format.rs     : RON price display
//! ```
//!
//! The estimator holds no state between calls. Every recalculation takes a
//! fresh [`FormSelection`] and a [`ModelAnalysis`](crate::geometry::ModelAnalysis).

pub mod contact;
pub mod estimator;
pub mod format;
pub mod validation;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use estimator::{estimate, processing_hours};
pub use format::format_price;
pub use validation::{validate, validate_color, ValidationError};

/// Manufacturing process offered by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Filament printing.
    Fdm,
    /// Resin printing.
    Sla,
    #[serde(rename = "laser")]
    LaserEngraving,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [
        ServiceType::Fdm,
        ServiceType::Sla,
        ServiceType::LaserEngraving,
    ];

    /// Stable key used in catalogs and on the wire.
    pub fn key(&self) -> &'static str {
        match self {
            ServiceType::Fdm => "fdm",
            ServiceType::Sla => "sla",
            ServiceType::LaserEngraving => "laser",
        }
    }

    /// Inverse of [`ServiceType::key`], case-insensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Process parameters; each service carries only the settings it uses.
///
/// Serialized internally tagged: `{ "type": "fdm", "layerHeightMm": 0.2, ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServiceSettings {
    Fdm {
        layer_height_mm: f64,
        infill_percent: u32,
    },
    Sla {
        layer_height_mm: f64,
    },
    #[serde(rename = "laser")]
    LaserEngraving {
        power_percent: u32,
        speed_percent: u32,
    },
}

impl ServiceSettings {
    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceSettings::Fdm { .. } => ServiceType::Fdm,
            ServiceSettings::Sla { .. } => ServiceType::Sla,
            ServiceSettings::LaserEngraving { .. } => ServiceType::LaserEngraving,
        }
    }
}

/// Optional finishing work billed per piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddOn {
    PostProcessing,
    Painting,
    Assembly,
}

/// How the finished order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    Pickup,
    Courier,
    Express,
}

impl DeliveryMethod {
    /// Flat delivery fee in RON, independent of quantity.
    pub fn cost(&self) -> f64 {
        match self {
            DeliveryMethod::Pickup => 0.0,
            DeliveryMethod::Courier => 15.0,
            DeliveryMethod::Express => 35.0,
        }
    }

    pub fn window(&self) -> DeliveryWindow {
        match self {
            DeliveryMethod::Pickup => DeliveryWindow::Immediate,
            DeliveryMethod::Courier => DeliveryWindow::TwoToThreeDays,
            DeliveryMethod::Express => DeliveryWindow::SameDay,
        }
    }
}

/// Color picked on the quote form.
///
/// Serialized adjacently tagged: `{ "kind": "catalog", "name": "Alb" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ColorChoice {
    /// One of the colors the material is stocked in.
    Catalog(String),
    /// Free-form request, e.g. a RAL code.
    Custom(String),
}

impl ColorChoice {
    pub fn name(&self) -> &str {
        match self {
            ColorChoice::Catalog(name) | ColorChoice::Custom(name) => name,
        }
    }
}

/// Everything the customer picked on the quote form.
///
/// `material_unit_price` comes from the material catalog: RON per cm³ for
/// FDM/SLA, RON per 100 cm² for laser engraving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSelection {
    pub service: ServiceSettings,
    pub material_unit_price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub add_ons: BTreeSet<AddOn>,
    pub delivery: DeliveryMethod,
}

impl FormSelection {
    pub fn service_type(&self) -> ServiceType {
        self.service.service_type()
    }
}

/// Itemized price in RON at full floating-point precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub material_cost: f64,
    pub processing_cost: f64,
    pub add_on_cost: f64,
    pub delivery_cost: f64,
    pub total: f64,
}

impl PriceBreakdown {
    /// Build a breakdown whose `total` is the sum of the four parts.
    pub fn new(material_cost: f64, processing_cost: f64, add_on_cost: f64, delivery_cost: f64) -> Self {
        Self {
            material_cost,
            processing_cost,
            add_on_cost,
            delivery_cost,
            total: material_cost + processing_cost + add_on_cost + delivery_cost,
        }
    }
}

/// How long the shop needs before the order is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingWindow {
    #[serde(rename = "24h")]
    Within24Hours,
    #[serde(rename = "24-48h")]
    Within48Hours,
    #[serde(rename = "2-3 days")]
    TwoToThreeDays,
}

impl ProcessingWindow {
    /// At most 24 hours → `24h`, at most 48 → `24-48h`, else `2-3 days`.
    pub fn from_hours(hours: f64) -> Self {
        if hours <= 24.0 {
            ProcessingWindow::Within24Hours
        } else if hours <= 48.0 {
            ProcessingWindow::Within48Hours
        } else {
            ProcessingWindow::TwoToThreeDays
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProcessingWindow::Within24Hours => "24h",
            ProcessingWindow::Within48Hours => "24-48h",
            ProcessingWindow::TwoToThreeDays => "2-3 days",
        }
    }

    pub fn label_ro(&self) -> &'static str {
        match self {
            ProcessingWindow::Within24Hours => "24h",
            ProcessingWindow::Within48Hours => "24-48h",
            ProcessingWindow::TwoToThreeDays => "2-3 zile",
        }
    }
}

impl fmt::Display for ProcessingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How long delivery takes once the order is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryWindow {
    #[serde(rename = "immediate")]
    Immediate,
    #[serde(rename = "2-3 days")]
    TwoToThreeDays,
    #[serde(rename = "same day")]
    SameDay,
}

impl DeliveryWindow {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryWindow::Immediate => "immediate",
            DeliveryWindow::TwoToThreeDays => "2-3 days",
            DeliveryWindow::SameDay => "same day",
        }
    }

    pub fn label_ro(&self) -> &'static str {
        match self {
            DeliveryWindow::Immediate => "Imediat",
            DeliveryWindow::TwoToThreeDays => "2-3 zile",
            DeliveryWindow::SameDay => "Aceeași zi",
        }
    }
}

impl fmt::Display for DeliveryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEstimate {
    pub processing_hours: f64,
    pub processing_window: ProcessingWindow,
    pub delivery_window: DeliveryWindow,
}

/// Result of one estimator run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub price: PriceBreakdown,
    pub time: TimeEstimate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_keys_round_trip() {
        for s in ServiceType::ALL {
            assert_eq!(ServiceType::from_key(s.key()), Some(s));
        }
        assert_eq!(ServiceType::from_key("LASER"), Some(ServiceType::LaserEngraving));
        assert_eq!(ServiceType::from_key("cnc"), None);
    }

    #[test]
    fn service_type_serializes_as_key() {
        let v = serde_json::to_value(ServiceType::LaserEngraving).unwrap();
        assert_eq!(v, "laser");
    }

    #[test]
    fn service_settings_tagged_camel_case() {
        let s = ServiceSettings::Fdm {
            layer_height_mm: 0.2,
            infill_percent: 20,
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["type"], "fdm");
        assert_eq!(v["layerHeightMm"], 0.2);
        assert_eq!(v["infillPercent"], 20);

        let laser: ServiceSettings =
            serde_json::from_str(r#"{"type":"laser","powerPercent":50,"speedPercent":40}"#).unwrap();
        assert_eq!(laser.service_type(), ServiceType::LaserEngraving);
    }

    #[test]
    fn add_ons_use_kebab_case() {
        let v = serde_json::to_value(AddOn::PostProcessing).unwrap();
        assert_eq!(v, "post-processing");
    }

    #[test]
    fn delivery_costs_and_windows() {
        assert_eq!(DeliveryMethod::Pickup.cost(), 0.0);
        assert_eq!(DeliveryMethod::Courier.cost(), 15.0);
        assert_eq!(DeliveryMethod::Express.cost(), 35.0);
        assert_eq!(DeliveryMethod::Pickup.window(), DeliveryWindow::Immediate);
        assert_eq!(DeliveryMethod::Courier.window(), DeliveryWindow::TwoToThreeDays);
        assert_eq!(DeliveryMethod::Express.window(), DeliveryWindow::SameDay);
    }

    #[test]
    fn processing_window_boundaries_are_inclusive() {
        assert_eq!(ProcessingWindow::from_hours(24.0), ProcessingWindow::Within24Hours);
        assert_eq!(ProcessingWindow::from_hours(24.5), ProcessingWindow::Within48Hours);
        assert_eq!(ProcessingWindow::from_hours(48.0), ProcessingWindow::Within48Hours);
        assert_eq!(ProcessingWindow::from_hours(48.1), ProcessingWindow::TwoToThreeDays);
    }

    #[test]
    fn windows_serialize_as_display_labels() {
        assert_eq!(serde_json::to_value(ProcessingWindow::Within48Hours).unwrap(), "24-48h");
        assert_eq!(serde_json::to_value(DeliveryWindow::SameDay).unwrap(), "same day");
        assert_eq!(ProcessingWindow::TwoToThreeDays.to_string(), "2-3 days");
        assert_eq!(DeliveryWindow::Immediate.label_ro(), "Imediat");
    }

    #[test]
    fn breakdown_total_is_sum_of_parts() {
        let b = PriceBreakdown::new(30.0, 16.5, 0.0, 15.0);
        assert_eq!(b.total, 30.0 + 16.5 + 0.0 + 15.0);
    }

    #[test]
    fn form_selection_add_ons_default_empty() {
        let json = r#"{
            "service": {"type": "sla", "layerHeightMm": 0.05},
            "materialUnitPrice": 80,
            "quantity": 1,
            "delivery": "pickup"
        }"#;
        let form: FormSelection = serde_json::from_str(json).expect("deserialize");
        assert!(form.add_ons.is_empty());
        assert_eq!(form.service_type(), ServiceType::Sla);
    }
}
