//! Material catalog: the per-service price list the estimator draws its
//! `material_unit_price` from.
//!
//! Catalogs are TOML files with one array of tables per service:
//!
//! ```toml
//! [[fdm]]
//! id = "pla"
//! name = "PLA"
//! price = 25.0
//! colors = ["Alb", "Negru"]
//! ```
//!
//! A default catalog is compiled into the binary from `catalogs/default.toml`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::quote::{ColorChoice, ServiceType};

const BUILTIN_CATALOG: &str = include_str!("../catalogs/default.toml");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog error: {0}")]
    Invalid(String),
    #[error("cannot read catalog: {0}")]
    Io(String),
    #[error("unknown {service} material: {id}")]
    UnknownMaterial { service: ServiceType, id: String },
    #[error("{material} is not stocked in {color}")]
    UnknownColor { material: String, color: String },
}

/// One orderable material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub name: String,
    /// RON per cm³ (fdm/sla) or RON per 100 cm² (laser).
    pub price: f64,
    #[serde(default)]
    pub colors: Vec<String>,
}

impl Material {
    /// Catalog colors must be listed for this material (ASCII case ignored).
    /// Custom colors are always accepted here.
    pub fn check_color(&self, color: &ColorChoice) -> Result<(), CatalogError> {
        match color {
            ColorChoice::Custom(_) => Ok(()),
            ColorChoice::Catalog(name) => {
                if self.colors.iter().any(|c| c.eq_ignore_ascii_case(name)) {
                    Ok(())
                } else {
                    Err(CatalogError::UnknownColor {
                        material: self.name.clone(),
                        color: name.clone(),
                    })
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialCatalog {
    #[serde(default)]
    pub fdm: Vec<Material>,
    #[serde(default)]
    pub sla: Vec<Material>,
    #[serde(default)]
    pub laser: Vec<Material>,
}

impl MaterialCatalog {
    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        parse(BUILTIN_CATALOG)
    }

    /// Read and validate a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("{}: {e}", path.display())))?;
        let catalog = parse(&text)?;
        tracing::info!(path = %path.display(), "loaded material catalog");
        Ok(catalog)
    }

    /// Materials offered for `service`, in file order.
    pub fn materials(&self, service: ServiceType) -> &[Material] {
        match service {
            ServiceType::Fdm => &self.fdm,
            ServiceType::Sla => &self.sla,
            ServiceType::LaserEngraving => &self.laser,
        }
    }

    pub fn find(&self, service: ServiceType, id: &str) -> Result<&Material, CatalogError> {
        self.materials(service)
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CatalogError::UnknownMaterial {
                service,
                id: id.to_string(),
            })
    }

    pub fn unit_price(&self, service: ServiceType, id: &str) -> Result<f64, CatalogError> {
        self.find(service, id).map(|m| m.price)
    }
}

/// Parse a TOML string into a [`MaterialCatalog`], running validation.
pub fn parse(toml_str: &str) -> Result<MaterialCatalog, CatalogError> {
    let catalog: MaterialCatalog =
        toml::from_str(toml_str).map_err(|e| CatalogError::Invalid(e.to_string()))?;
    validate(&catalog)?;
    Ok(catalog)
}

fn validate(catalog: &MaterialCatalog) -> Result<(), CatalogError> {
    for service in ServiceType::ALL {
        let mut seen = HashSet::new();
        for material in catalog.materials(service) {
            if material.id.trim().is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "{service} material \"{}\" has an empty id",
                    material.name
                )));
            }
            if !seen.insert(material.id.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate {service} material id \"{}\"",
                    material.id
                )));
            }
            if !(material.price.is_finite() && material.price > 0.0) {
                return Err(CatalogError::Invalid(format!(
                    "{service} material \"{}\" must have a positive price",
                    material.id
                )));
            }
        }
    }
    Ok(())
}
